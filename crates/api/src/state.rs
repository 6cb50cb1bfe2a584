use std::sync::Arc;

use gymplan_db::DbPool;

use crate::config::ServerConfig;

/// Handler state. Cloned per request; both fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// JWT keys and password policy are read from here at request time.
    pub config: Arc<ServerConfig>,
}
