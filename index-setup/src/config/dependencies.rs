//! Dependency initialization and wiring for the index setup tools.

use tracing::info;

use crate::config::MeilisearchConfig;
use crate::ProvisionError;
use index_setup_repository::{IndexSetupClient, MeilisearchProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The setup client, holding the single Meilisearch connection.
    pub client: IndexSetupClient,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`MeilisearchConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ProvisionError> {
        let config = MeilisearchConfig::from_env()?;
        Self::new(&config)
    }

    /// Initialize all dependencies from explicit settings.
    ///
    /// Does not contact the server; call `health_check` on the client for that.
    pub fn new(config: &MeilisearchConfig) -> Result<Self, ProvisionError> {
        info!(
            connection_addr = %config.connection_addr,
            authenticated = config.master_key.is_some(),
            "Initializing dependencies"
        );

        let provider =
            MeilisearchProvider::new(&config.connection_addr, config.master_key.as_deref())?
                .with_task_polling(config.task_interval, config.task_timeout);

        Ok(Self {
            client: IndexSetupClient::new(Box::new(provider)),
        })
    }
}
