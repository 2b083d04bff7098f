use axum::{routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod guard;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:project_id",
            get(handlers::get_project)
                .patch(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/users/:user_id", get(handlers::list_user_projects))
}
