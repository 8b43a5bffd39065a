use std::sync::Arc;

use crate::{certificate::CertificateRenderer, config::Config};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub renderer: Arc<dyn CertificateRenderer>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CertificateRenderer> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}
