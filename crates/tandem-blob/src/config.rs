use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BlobResult;
use crate::fs::FsBlobStore;
use crate::memory::InMemoryBlobStore;
use crate::traits::BlobStore;

/// Startup-time selection of the blob backend.
///
/// The backend is fixed at construction; callers hold an `Arc<dyn
/// BlobStore>` and never branch on the mode again. Deployments backed by a
/// networked object store construct their own trait object instead of going
/// through this config.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BlobBackendConfig {
    /// Volatile in-memory store; data is lost on shutdown.
    Memory,
    /// Local-filesystem store rooted at `root` (offline operation).
    Filesystem { root: PathBuf },
}

impl BlobBackendConfig {
    /// Construct the configured backend.
    pub fn open(&self) -> BlobResult<Arc<dyn BlobStore>> {
        match self {
            Self::Memory => Ok(Arc::new(InMemoryBlobStore::new())),
            Self::Filesystem { root } => Ok(Arc::new(FsBlobStore::open(root.clone())?)),
        }
    }
}

impl Default for BlobBackendConfig {
    fn default() -> Self {
        Self::Filesystem {
            root: PathBuf::from("data/blobs"),
        }
    }
}
