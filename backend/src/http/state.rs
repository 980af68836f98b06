//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::repository::MeasurementRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Measurement store
    pub repository: Arc<dyn MeasurementRepository>,
    /// Listing limits and bind settings
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and default configuration.
    pub fn new(repository: Arc<dyn MeasurementRepository>) -> Self {
        Self::with_config(repository, ServerConfig::default())
    }

    pub fn with_config(repository: Arc<dyn MeasurementRepository>, config: ServerConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
