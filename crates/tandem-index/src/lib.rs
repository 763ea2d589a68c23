//! Search index capability for Tandem.
//!
//! The index is the derivative copy of every record: a queryable document
//! store keyed by record id, rebuildable at any time from the blob store.
//! The core never defines token matching -- it defines only the contract:
//! pass a query string and options in, get back an ordered sequence of
//! documents, deduplicated by id, lazily producible page by page.
//!
//! # Key Types
//!
//! - [`SearchIndex`] -- the capability trait all backends implement
//! - [`Query`] / [`SortSpec`] / [`Page`] -- the query model
//! - [`Scroll`] -- restartable lazy sequence over paged results
//! - [`InMemorySearchIndex`] -- backend for tests, embedding, and offline use

pub mod error;
pub mod memory;
pub mod query;
pub mod scroll;
pub mod traits;

pub use error::{IndexError, IndexResult};
pub use memory::InMemorySearchIndex;
pub use query::{Page, Query, SortOrder, SortSpec, DEFAULT_PAGE_SIZE};
pub use scroll::Scroll;
pub use traits::{IndexStatus, SearchIndex};
