use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Request-level failure taxonomy. Every handler, extractor and guard
/// answers with one of these; the store's raw failures never reach a
/// client as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad input: missing fields, policy violations, uniqueness conflicts.
    #[error("{0}")]
    Validation(String),
    /// Missing/invalid token, or an authenticated caller touching a
    /// resource they don't own. Both are 401 here, matching the clients.
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    /// Unexpected store/runtime failure. Logged, never detailed outward.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(cause) => {
                error!(error = %cause, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            // The store's unique constraints are the authoritative arbiter
            // behind the advisory pre-checks at registration; a violation
            // surfaces as the same message the pre-check would have given.
            StoreError::Conflict { constraint } if constraint.contains("user_name") => {
                ApiError::Validation("Username already taken".into())
            }
            StoreError::Conflict { constraint } if constraint.contains("email") => {
                ApiError::Validation("Email is already being used".into())
            }
            StoreError::Conflict { constraint } => {
                ApiError::Internal(anyhow::anyhow!("unexpected unique violation: {constraint}"))
            }
            StoreError::Other(cause) => ApiError::Internal(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn validation_renders_400_with_message() {
        let response = ApiError::Validation("Email is invalid".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Email is invalid");
    }

    #[tokio::test]
    async fn unauthorized_renders_401() {
        let response = ApiError::Unauthorized("Missing bearer token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn internal_hides_the_cause() {
        let response = ApiError::Internal(anyhow::anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn conflicts_map_to_the_advisory_messages() {
        let err: ApiError = StoreError::Conflict {
            constraint: "sequencer_users_user_name_key".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Username already taken");

        let err: ApiError = StoreError::Conflict {
            constraint: "sequencer_users_email_key".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Email is already being used");
    }
}
