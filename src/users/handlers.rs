use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{RegisterRequest, UserResponse},
    services::{validate_email, validate_password},
};
use crate::{auth::password::hash_password, error::ApiError, state::AppState, store::NewUser};

/// Absent and empty both count as missing, like the original API.
fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!(
            "Missing '{field}' in request body"
        ))),
    }
}

/// POST /api/users
///
/// Registration pipeline: required fields, password policy, email
/// format, uniqueness pre-checks (advisory; the store constraint is
/// authoritative), hash, insert, sanitized 201 with Location.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), ApiError> {
    let user_name = required(payload.user_name, "user_name")?;
    let email = required(payload.email, "email")?;
    let password = required(payload.password, "password")?;

    if let Some(message) = validate_password(&password) {
        warn!(%user_name, "password rejected by policy");
        return Err(ApiError::Validation(message.into()));
    }
    if let Some(message) = validate_email(&email) {
        return Err(ApiError::Validation(message.into()));
    }

    // Both pre-checks run; a user_name collision is reported first.
    let name_taken = state.users.find_by_user_name(&user_name).await?.is_some();
    let email_taken = state.users.find_by_email(&email).await?.is_some();
    if name_taken {
        return Err(ApiError::Validation("Username already taken".into()));
    }
    if email_taken {
        return Err(ApiError::Validation("Email is already being used".into()));
    }

    // Hashing is CPU-bound; keep it off the async path.
    let plain = password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let user = state
        .users
        .insert(NewUser {
            user_name,
            email,
            password_hash,
        })
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/api/users/{}", user.id).parse().unwrap(),
    );

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, headers, Json(UserResponse::from(&user))))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    async fn register(app: axum::Router, body: serde_json::Value) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn valid_user() -> serde_json::Value {
        serde_json::json!({
            "user_name": "u1", "email": "u1@e.com", "password": "Password1!"
        })
    }

    #[tokio::test]
    async fn register_creates_a_user_without_leaking_the_password() {
        let app = build_app(AppState::fake());
        let response = register(app, valid_user()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = json_body(response).await;
        assert_eq!(body["user_name"], "u1");
        assert_eq!(body["email"], "u1@e.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
        assert!(body["date_created"].is_string());
        assert_eq!(
            location.as_deref(),
            Some(format!("/api/users/{}", body["id"]).as_str())
        );
    }

    #[tokio::test]
    async fn register_reports_each_missing_field() {
        for field in ["user_name", "email", "password"] {
            let mut body = valid_user();
            body.as_object_mut().unwrap().remove(field);
            let app = build_app(AppState::fake());
            let response = register(app, body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = json_body(response).await;
            assert_eq!(body["error"], format!("Missing '{field}' in request body"));
        }
    }

    #[tokio::test]
    async fn register_treats_empty_fields_as_missing() {
        let mut body = valid_user();
        body["user_name"] = serde_json::json!("");
        let app = build_app(AppState::fake());
        let response = register(app, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Missing 'user_name' in request body");
    }

    #[tokio::test]
    async fn register_enforces_the_password_policy() {
        let mut body = valid_user();
        body["password"] = serde_json::json!("weakpass");
        let app = build_app(AppState::fake());
        let response = register(app, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "Password must contain 1 upper case, lower case, number, and special character"
        );
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let mut body = valid_user();
        body["email"] = serde_json::json!("not-an-email");
        let app = build_app(AppState::fake());
        let response = register(app, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Email is invalid");
    }

    #[tokio::test]
    async fn duplicate_user_name_yields_one_success_and_one_400() {
        let app = build_app(AppState::fake());
        let response = register(app.clone(), valid_user()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Same user_name, different email: the user_name collision wins.
        let mut second = valid_user();
        second["email"] = serde_json::json!("other@e.com");
        let response = register(app, second).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Username already taken");
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_when_user_name_is_free() {
        let app = build_app(AppState::fake());
        let response = register(app.clone(), valid_user()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let mut second = valid_user();
        second["user_name"] = serde_json::json!("u2");
        let response = register(app, second).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Email is already being used");
    }

    #[tokio::test]
    async fn user_name_lookup_is_case_sensitive() {
        // Documented limitation: "U1" and "u1" are distinct users.
        let app = build_app(AppState::fake());
        let response = register(app.clone(), valid_user()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let second = serde_json::json!({
            "user_name": "U1", "email": "u2@e.com", "password": "Password1!"
        });
        let response = register(app, second).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
