//! Record entity and dual-store coordinator for Tandem.
//!
//! Every record lives in two places: the blob store holds the authoritative
//! JSON envelope, the search index holds a derivative document rebuildable
//! from it. This crate owns the discipline that keeps the two in agreement:
//!
//! - **Save** writes blob first, index second. A blob failure stops the
//!   write; an index failure after a successful blob write surfaces as
//!   [`RecordError::PartialWrite`] and is healed by the next reindex.
//! - **Delete** removes the index copy first (the discoverable one), then
//!   the blob, so a failure never leaves search results pointing at nothing.
//! - **Reindex** walks every blob key and re-upserts the index; the blob
//!   store is truth, so reindex is idempotent and safe under live traffic.
//!
//! Per record identity the stores move through: `absent` → `blob-only`
//! (index write pending or failed) → `consistent` → `index-only` (anomaly)
//! → `absent`. `consistent` is the goal state after any write; `blob-only`
//! is the only expected-recoverable transient; `index-only` is resolved
//! only by purge or record-level delete.
//!
//! # Key Types
//!
//! - [`Record`] — identity, payload, epoch, and the store codecs
//! - [`Collection`] — the stateless coordinator bound to one dataset name
//! - [`StoreContext`] — injected blob/index/clock handles (no globals)
//! - [`ReindexReport`] — outcome of one reconciliation run

pub mod collection;
pub mod context;
pub mod error;
pub mod record;

pub use collection::{Collection, ReindexReport};
pub use context::StoreContext;
pub use error::{DualOp, RecordError, RecordResult};
pub use record::Record;
