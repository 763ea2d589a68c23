use async_trait::async_trait;

use tandem_types::Document;

use crate::error::IndexResult;
use crate::query::{Page, Query};

/// Outcome of [`SearchIndex::ensure_index`]. Both variants are success;
/// "already exists" is never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    AlreadyExists,
}

/// Queryable document index keyed by record id.
///
/// All implementations must satisfy these invariants:
/// - `ensure_index` is idempotent; an existing index is success.
/// - `upsert` is last-write-wins by id; re-upserting an unchanged document
///   is a no-op in effect.
/// - Query results are ordered per the sort spec and deduplicated by id.
/// - The index never holds data that cannot be regenerated from the blob
///   store -- it is derivative by contract.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the named index if it does not exist.
    async fn ensure_index(&self, name: &str) -> IndexResult<IndexStatus>;

    /// Insert or overwrite the document stored under `id`.
    async fn upsert(&self, collection: &str, id: &str, document: Document) -> IndexResult<()>;

    /// Remove the document stored under `id`.
    async fn delete(&self, collection: &str, id: &str) -> IndexResult<()>;

    /// Fetch the document stored under `id`.
    async fn get(&self, collection: &str, id: &str) -> IndexResult<Document>;

    /// Run one page of a query. A query against a collection that was never
    /// indexed returns an empty page, not an error.
    async fn query(&self, collection: &str, query: &Query) -> IndexResult<Page>;
}
