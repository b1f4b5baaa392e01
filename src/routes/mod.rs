pub mod auth;
pub mod extract;
pub mod form;
pub mod health;
pub mod reports;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form::index))
        .route("/api/health", get(health::health))
        .route("/api/login", post(auth::login))
        .route("/api/reports", post(reports::create_report))
        .with_state(state)
}
