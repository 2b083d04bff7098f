use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    store::{Project, User},
};

/// Ownership guard for single-resource routes: authenticates, loads the
/// target project and checks the owner before the handler runs.
///
/// An existing-but-foreign project answers 401 (not 403), the same as
/// the unauthenticated case. Existing clients rely on that.
pub struct OwnedProject {
    pub user: User,
    pub project: Project,
}

#[async_trait]
impl FromRequestParts<AppState> for OwnedProject {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        let Path(project_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("Project doesn't exist"))?;

        let project = state
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ApiError::NotFound("Project doesn't exist"))?;

        if project.user_id != user.id {
            return Err(ApiError::Unauthorized("Unauthorized request"));
        }

        Ok(OwnedProject { user, project })
    }
}
