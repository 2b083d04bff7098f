//! Trait seam in front of the relational store.
//!
//! Handlers talk to `UserStore`/`ProjectStore` only; the Postgres
//! implementation lives in [`pg`], and [`mem`] backs
//! `AppState::fake()` for router tests.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

pub mod mem;
pub mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub date_created: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    /// Opaque sequencer state; never inspected here.
    pub project_data: Value,
    pub user_id: i64,
    pub date_created: OffsetDateTime,
    pub date_modified: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug)]
pub struct NewProject {
    pub title: String,
    pub project_data: Value,
    pub user_id: i64,
}

#[derive(Debug)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub project_data: Option<Value>,
    pub date_modified: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. The constraint name lets
    /// the caller report which field collided.
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Lookups are case-sensitive exact matches; no normalization is applied
/// to user names or emails before querying (known limitation).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Project>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, StoreError>;
    async fn insert(&self, new_project: NewProject) -> Result<Project, StoreError>;
    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<(), StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
