use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{
    NewProject, NewUser, Project, ProjectPatch, ProjectStore, StoreError, User, UserStore,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::Conflict {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Other(e.into())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, email, password_hash, date_created
            FROM sequencer_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, email, password_hash, date_created
            FROM sequencer_users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, email, password_hash, date_created
            FROM sequencer_users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO sequencer_users (user_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_name, email, password_hash, date_created
            "#,
        )
        .bind(&new_user.user_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, project_data, user_id, date_created, date_modified
            FROM sequencer_projects
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Project>, StoreError> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, project_data, user_id, date_created, date_modified
            FROM sequencer_projects
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, project_data, user_id, date_created, date_modified
            FROM sequencer_projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn insert(&self, new_project: NewProject) -> Result<Project, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO sequencer_projects (title, project_data, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, project_data, user_id, date_created, date_modified
            "#,
        )
        .bind(&new_project.title)
        .bind(&new_project.project_data)
        .bind(new_project.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn update(&self, id: i64, patch: ProjectPatch) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE sequencer_projects
            SET title = COALESCE($2, title),
                project_data = COALESCE($3, project_data),
                date_modified = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.project_data)
        .bind(patch.date_modified)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sequencer_projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
