use std::sync::Arc;

use crate::config::ServerConfig;

/// Handler state. Clones share the pool and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub pool: tmc_db::DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: tmc_db::DbPool, config: Arc<ServerConfig>) -> Self {
        Self { pool, config }
    }
}
