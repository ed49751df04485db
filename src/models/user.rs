use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile (collection: users), unique by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial profile update for `PUT /user/{email}`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UserUpdate {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserUpdate {
    /// Fields to `$set`. The path email is the record key, so `_id` and `email` are dropped.
    ///
    /// The remaining fields must still read back as a `User` once applied, so a
    /// mistyped known field (e.g. a numeric `name`) is rejected here.
    pub fn into_set_fields(self, email: &str) -> Result<Map<String, Value>, serde_json::Error> {
        let mut fields = self.fields;
        fields.remove("_id");
        fields.remove("email");

        let mut applied = fields.clone();
        applied.insert("email".to_string(), Value::String(email.to_string()));
        serde_json::from_value::<User>(Value::Object(applied))?;

        Ok(fields)
    }
}

/// Outcome of the create-once user insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCreation {
    Created(String),
    AlreadyExists,
}
