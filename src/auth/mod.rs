use axum::{routing::post, Router};

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::login))
}
