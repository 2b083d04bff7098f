use axum::{
    extract::{FromRef, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse},
    jwt::JwtKeys,
    password::verify_password,
};
use crate::{error::ApiError, state::AppState};

/// POST /api/auth/login
///
/// Verifies credentials and answers with a signed bearer token. Unknown
/// user and wrong password are indistinguishable to the caller.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_name = payload
        .user_name
        .ok_or_else(|| ApiError::Validation("Missing 'user_name' in request body".into()))?;
    let password = payload
        .password
        .ok_or_else(|| ApiError::Validation("Missing 'password' in request body".into()))?;

    let user = state
        .users
        .find_by_user_name(&user_name)
        .await?
        .ok_or_else(|| {
            warn!(%user_name, "login with unknown user_name");
            ApiError::Validation("Incorrect user_name or password".into())
        })?;

    // Argon2 verification is CPU-bound; keep it off the async path.
    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if !ok {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Validation("Incorrect user_name or password".into()));
    }

    let auth_token = JwtKeys::from_ref(&state).sign(&user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse { auth_token }))
}
