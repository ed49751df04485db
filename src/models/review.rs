use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Review (collection: reviews)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
