use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::sanitize::sanitize;
use crate::store::Project;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub project_data: Option<Value>,
}

/// Partial update: at least one field must be present.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub project_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub project_data: Value,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub date_modified: Option<OffsetDateTime>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            title: sanitize(&project.title),
            project_data: project.project_data.clone(),
            user_id: project.user_id,
            date_created: project.date_created,
            date_modified: project.date_modified,
        }
    }
}
