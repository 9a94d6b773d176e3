use garde::Validate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A directory entry, exactly as stored and served.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow, JsonSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Wire payload for create and update. Updates are full replacements, so
/// both fields are required on every write.
///
/// The fields are optional carriers: `required` rejects a missing field at
/// validation time, which lets one pass report every absent field instead of
/// failing on the first during deserialization.
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct UserPayload {
    #[garde(required, length(chars, min = 1, max = 100))]
    #[schemars(required)]
    pub name: Option<String>,
    #[garde(required, email, length(chars, max = 100))]
    #[schemars(required)]
    pub email: Option<String>,
}

impl UserPayload {
    /// Extract the field values. Only meaningful after validation, which
    /// guarantees both fields are present.
    pub fn into_parts(self) -> (String, String) {
        (self.name.unwrap_or_default(), self.email.unwrap_or_default())
    }
}

/// Query parameters accepted by the listing route.
#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub name: Option<String>,
}
