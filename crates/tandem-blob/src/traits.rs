use async_trait::async_trait;

use crate::error::BlobResult;

/// Durable key-addressed byte storage.
///
/// All implementations must satisfy these invariants:
/// - `put` overwrites any existing value; callers never create namespaces
///   explicitly (prefix structure appears on demand).
/// - `get` and `delete` on a missing key report `BlobError::NotFound`,
///   distinct from transport and I/O failure.
/// - `list` enumerates every stored key with no silent truncation; order is
///   unspecified. Bulk reindex treats this enumeration as the source of
///   truth for what exists.
/// - The store never interprets values -- it is a pure key-value store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any existing value.
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()>;

    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> BlobResult<Vec<u8>>;

    /// Remove the value stored under `key`.
    ///
    /// Removing a nonexistent key is reported as `NotFound`, not silently
    /// ignored.
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Enumerate all stored keys.
    async fn list(&self) -> BlobResult<Vec<String>>;
}
