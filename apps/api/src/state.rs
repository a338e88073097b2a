use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Kept on state so handlers gaining config-driven behavior don't need
    /// re-plumbing; currently only read at startup.
    #[allow(dead_code)]
    pub config: Config,
}
