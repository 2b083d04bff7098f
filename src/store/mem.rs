//! In-memory store used by `AppState::fake()` so router tests run
//! without Postgres. Mirrors the schema's unique constraints so the
//! conflict path behaves like the real store.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{
    NewProject, NewUser, Project, ProjectPatch, ProjectStore, StoreError, User, UserStore,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    projects: Vec<Project>,
    next_user_id: i64,
    next_project_id: i64,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner.users.iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().expect("mem store lock");
        if inner.users.iter().any(|u| u.user_name == new_user.user_name) {
            return Err(StoreError::Conflict {
                constraint: "sequencer_users_user_name_key".into(),
            });
        }
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict {
                constraint: "sequencer_users_email_key".into(),
            });
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            user_name: new_user.user_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            date_created: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for MemStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner.projects.clone())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, StoreError> {
        let inner = self.inner.lock().expect("mem store lock");
        Ok(inner.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, new_project: NewProject) -> Result<Project, StoreError> {
        let mut inner = self.inner.lock().expect("mem store lock");
        inner.next_project_id += 1;
        let project = Project {
            id: inner.next_project_id,
            title: new_project.title,
            project_data: new_project.project_data,
            user_id: new_project.user_id,
            date_created: OffsetDateTime::now_utc(),
            date_modified: None,
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("mem store lock");
        if let Some(project) = inner.projects.iter_mut().find(|p| p.id == id) {
            if let Some(title) = patch.title {
                project.title = title;
            }
            if let Some(data) = patch.project_data {
                project.project_data = data;
            }
            project.date_modified = Some(patch.date_modified);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("mem store lock");
        inner.projects.retain(|p| p.id != id);
        Ok(())
    }
}
