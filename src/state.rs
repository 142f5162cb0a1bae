// src/state.rs

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;

/// Shared handler state. Handlers pull out only the piece they need
/// (`State<PgPool>` or `State<Config>`) through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    /// Backing store for exams, answer keys, roster and results.
    pub pool: PgPool,
    /// JWT secret, upload location and limits.
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self { pool, config }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app: &AppState) -> Self {
        app.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(app: &AppState) -> Self {
        app.config.clone()
    }
}
