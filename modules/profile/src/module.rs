use std::sync::Arc;

use tracing::info;

use crate::config::ProfileConfig;
use crate::contract::client::DataClient;
use crate::domain::view::ProfileView;
use crate::infra::HttpDataClient;
use modkit::TracedClient;

/// Wiring for the profile module: one shared `DataClient`, handed to every view it builds.
#[derive(Clone)]
pub struct ProfileModule {
    client: Arc<dyn DataClient>,
    config: ProfileConfig,
}

impl ProfileModule {
    /// Build the HTTP-backed module from configuration.
    pub fn from_config(config: ProfileConfig) -> anyhow::Result<Self> {
        let base = config.validate()?;
        info!(base_url = %base, "profile module using remote API");
        let client = HttpDataClient::new(TracedClient::default(), base);
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Use a caller-provided client (tests, alternative transports).
    pub fn with_client(client: Arc<dyn DataClient>, config: ProfileConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> Arc<dyn DataClient> {
        self.client.clone()
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// A new, idle view sharing this module's client.
    pub fn new_view(&self) -> ProfileView {
        ProfileView::new(self.client.clone()).with_user_ids(self.config.user_ids())
    }
}
