use std::sync::Arc;

use tandem_blob::{BlobStore, InMemoryBlobStore};
use tandem_index::{InMemorySearchIndex, SearchIndex};
use tandem_types::{Clock, SystemClock};

/// Injected store handles shared by every collection.
///
/// The context replaces process-wide singletons: whoever constructs the
/// deployment decides which blob backend, which index backend, and which
/// clock to use, and every operation reads them from here. Cloning is cheap
/// (three `Arc`s).
#[derive(Clone)]
pub struct StoreContext {
    pub blob: Arc<dyn BlobStore>,
    pub index: Arc<dyn SearchIndex>,
    pub clock: Arc<dyn Clock>,
}

impl StoreContext {
    pub fn new(
        blob: Arc<dyn BlobStore>,
        index: Arc<dyn SearchIndex>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { blob, index, clock }
    }

    /// Fully in-memory context with the system clock. For tests and
    /// embedding.
    pub fn in_memory() -> Self {
        Self {
            blob: Arc::new(InMemoryBlobStore::new()),
            index: Arc::new(InMemorySearchIndex::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Swap the clock; used by tests for deterministic epochs.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_types::ManualClock;

    #[tokio::test]
    async fn in_memory_context_is_usable() {
        let ctx = StoreContext::in_memory();
        ctx.blob.put("k", b"v").await.unwrap();
        assert_eq!(ctx.blob.get("k").await.unwrap(), b"v");
        assert!(ctx.clock.now_millis() > 0);
    }

    #[test]
    fn with_clock_swaps_the_clock() {
        let ctx = StoreContext::in_memory().with_clock(Arc::new(ManualClock::new(42)));
        assert_eq!(ctx.clock.now_millis(), 42);
    }
}
