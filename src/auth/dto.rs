use serde::{Deserialize, Serialize};

/// Request body for login. Fields stay optional so missing ones get the
/// field-specific 400 instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}
