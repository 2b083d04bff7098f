use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{CreateProjectRequest, ProjectResponse, UpdateProjectRequest},
    guard::OwnedProject,
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
    store::{NewProject, ProjectPatch},
};

/// Values the original API treats as absent: null, false, 0 and "".
/// Objects and arrays always count as present, even empty ones.
fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// GET /api/projects — unscoped listing behind auth.
#[instrument(skip_all)]
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.projects.list_all().await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

/// POST /api/projects — owner and creation timestamp are stamped
/// server-side, never taken from the body.
#[instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ProjectResponse>), ApiError> {
    let title = match payload.title {
        Some(t) if !t.is_empty() => t,
        _ => {
            return Err(ApiError::Validation(
                "Missing 'title' in request body".into(),
            ))
        }
    };
    let project_data = match payload.project_data {
        Some(d) if !is_blank(&d) => d,
        _ => {
            return Err(ApiError::Validation(
                "Missing 'project_data' in request body".into(),
            ))
        }
    };

    let project = state
        .projects
        .insert(NewProject {
            title,
            project_data,
            user_id: user.id,
        })
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/api/projects/{}", project.id).parse().unwrap(),
    );

    info!(project_id = %project.id, user_id = %user.id, "project created");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(ProjectResponse::from(&project)),
    ))
}

/// GET /api/projects/:project_id
#[instrument(skip(guard))]
pub async fn get_project(guard: OwnedProject) -> Json<ProjectResponse> {
    Json(ProjectResponse::from(&guard.project))
}

/// PATCH /api/projects/:project_id
#[instrument(skip(state, guard, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    guard: OwnedProject,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<StatusCode, ApiError> {
    let title = payload.title.filter(|t| !t.is_empty());
    let project_data = payload.project_data.filter(|d| !is_blank(d));

    if title.is_none() && project_data.is_none() {
        return Err(ApiError::Validation(
            "Request body must contain either 'title' or 'project_data'".into(),
        ));
    }

    state
        .projects
        .update(
            guard.project.id,
            ProjectPatch {
                title,
                project_data,
                date_modified: OffsetDateTime::now_utc(),
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/projects/:project_id — full removal, no tombstone.
#[instrument(skip(state, guard))]
pub async fn delete_project(
    State(state): State<AppState>,
    guard: OwnedProject,
) -> Result<StatusCode, ApiError> {
    state.projects.delete(guard.project.id).await?;
    info!(project_id = %guard.project.id, user_id = %guard.user.id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/users/:user_id — the path id must be the caller.
/// A non-numeric id can never match the caller, so it gets the same 401.
#[instrument(skip_all)]
pub async fn list_user_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let Path(user_id) =
        user_id.map_err(|_| ApiError::Unauthorized("Unauthorized request"))?;
    if user_id != user.id {
        return Err(ApiError::Unauthorized("Unauthorized request"));
    }
    let projects = state.projects.list_by_user(user.id).await?;
    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}
