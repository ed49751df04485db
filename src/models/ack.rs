use serde::Serialize;

/// Acknowledgment for a single insert.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: String) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Returned instead of an [`InsertAck`] when the user is already registered.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExistsAck {
    pub message: String,
    pub inserted_id: Option<String>,
}

impl ExistsAck {
    pub fn user() -> Self {
        Self {
            message: "user already exists".to_string(),
            inserted_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}
