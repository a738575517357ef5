//! Dependency initialization and wiring for the graph mirror.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{ConnectionMode, MirrorConfig};
use crate::dispatcher::BatchDispatcher;
use crate::extension::{load_settings, SearchMirror};
use crate::MirrorError;
use graph_mirror_repository::{ConnectionConfig, OpenSearchProvider, SearchIndexProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configuration everything was built from.
    pub config: MirrorConfig,
    /// The mirror, connected and ready to translate.
    pub mirror: SearchMirror,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Must be called from within a tokio runtime; background dispatches are
    /// spawned on it.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(MirrorError)` - Invalid configuration, a spec that disables the
    ///   mirror, or a connection failure in fail-fast mode
    pub async fn new() -> Result<Self, MirrorError> {
        Self::from_config(MirrorConfig::from_env()?).await
    }

    /// Initialize all dependencies from an explicit configuration.
    pub async fn from_config(config: MirrorConfig) -> Result<Self, MirrorError> {
        info!(
            opensearch_url = %config.connection.url,
            dispatch_mode = ?config.dispatch_mode,
            dispatch_timeout_secs = config.dispatch_timeout.as_secs(),
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        // Settings first: a disabled mirror never touches the network.
        let settings = load_settings(&config)?;

        let provider = Self::connect_to_opensearch(
            &config.connection,
            config.connection_mode,
            config.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let dispatcher = BatchDispatcher::new(Arc::new(provider), Handle::current())
            .with_timeout(config.dispatch_timeout);
        let mirror = SearchMirror::new(settings, dispatcher);

        Ok(Self { config, mirror })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        connection: &ConnectionConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, MirrorError> {
        loop {
            match Self::try_connect_opensearch(connection).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(MirrorError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %connection.url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Build the provider and check the cluster answers.
    async fn try_connect_opensearch(
        connection: &ConnectionConfig,
    ) -> Result<OpenSearchProvider, MirrorError> {
        let provider = OpenSearchProvider::new(connection).await.map_err(|e| {
            MirrorError::config(format!("Failed to create OpenSearch provider: {}", e))
        })?;

        provider
            .ping()
            .await
            .map_err(|e| MirrorError::config(format!("OpenSearch ping failed: {}", e)))?;

        Ok(provider)
    }
}
