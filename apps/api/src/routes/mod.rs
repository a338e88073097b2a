pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::portfolio::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ingestion: PDF upload → extraction → preview or persist
        .route("/api/v1/ai/parse", post(handlers::handle_parse_resume))
        // Portfolio API
        .route(
            "/api/v1/portfolio/publish",
            post(handlers::handle_publish),
        )
        .route(
            "/api/v1/portfolio/:slug",
            get(handlers::handle_get_by_slug),
        )
        .route(
            "/api/v1/portfolio/lookup",
            post(handlers::handle_owner_lookup),
        )
        // Owner identity
        .route("/api/v1/auth/register", post(handlers::handle_register))
        .with_state(state)
}
