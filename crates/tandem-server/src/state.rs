use std::sync::Arc;

use tandem_records::Collection;

use crate::gate::AccessGate;

/// Shared per-deployment state handed to every handler.
///
/// One active collection per deployment; the gate fronts every operation.
#[derive(Clone)]
pub struct AppState {
    pub collection: Collection,
    pub gate: Arc<dyn AccessGate>,
}

impl AppState {
    pub fn new(collection: Collection, gate: Arc<dyn AccessGate>) -> Self {
        Self { collection, gate }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("collection", &self.collection.name())
            .finish_non_exhaustive()
    }
}
