use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::sanitize::sanitize;
use crate::store::User;

/// Registration body. Optional fields so an absent one produces the
/// field-specific 400 "Missing '...' in request body".
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// External representation of a user. The password hash never appears
/// here; free-text fields are sanitized on the way out.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: sanitize(&user.user_name),
            email: sanitize(&user.email),
            date_created: user.date_created,
        }
    }
}
