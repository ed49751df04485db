use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Admission application (collection: admissions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Admission {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner of the application; "my admissions" filters on it.
    pub candidate_email: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
