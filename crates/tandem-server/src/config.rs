use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tandem_blob::BlobBackendConfig;
use tandem_index::{InMemorySearchIndex, SearchIndex};
use tandem_records::{Collection, RecordError, StoreContext};
use tandem_types::SystemClock;

use crate::error::{ServerError, ServerResult};
use crate::gate::{AccessGate, ApiKeyGate, OpenGate};
use crate::state::AppState;

/// Deployment configuration.
///
/// The blob backend is selected here ([`BlobBackendConfig`]); the search
/// index is the embedded in-memory backend. Deployments fronting a
/// networked object store or search service construct their own
/// [`StoreContext`] and [`AppState`] instead of going through
/// [`build_state`](Self::build_state).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// The single active collection for this deployment.
    pub collection: String,
    pub storage: BlobBackendConfig,
    /// Enables the API-key gate when set; otherwise everything is open.
    pub api_key: Option<String>,
    /// With the gate active, safe (read) operations stay public.
    pub allow_anonymous_read: bool,
    /// Run a reindex at startup. Useful when the embedded index starts
    /// empty and the blob store is durable.
    pub seed_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7431".parse().expect("valid default addr"),
            collection: "records".to_string(),
            storage: BlobBackendConfig::default(),
            api_key: None,
            allow_anonymous_read: true,
            seed_on_start: false,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// The gate this configuration implies.
    pub fn gate(&self) -> Arc<dyn AccessGate> {
        match &self.api_key {
            Some(key) => Arc::new(ApiKeyGate::new(key.clone(), self.allow_anonymous_read)),
            None => Arc::new(OpenGate),
        }
    }

    /// Construct the application state: open the configured blob backend,
    /// embed the in-memory index, and bind the collection.
    pub fn build_state(&self) -> ServerResult<AppState> {
        let blob = self.storage.open().map_err(RecordError::from)?;
        let index: Arc<dyn SearchIndex> = Arc::new(InMemorySearchIndex::new());
        let stores = StoreContext::new(blob, index, Arc::new(SystemClock));
        let collection = Collection::new(self.collection.as_str(), stores);
        Ok(AppState::new(collection, self.gate()))
    }
}
