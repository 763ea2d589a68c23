use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All values are held in memory behind a
/// `RwLock` for safe concurrent access. Values are cloned on read.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }

    /// Remove all blobs from the store.
    pub fn clear(&self) {
        self.blobs.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn list(&self) -> BlobResult<Vec<String>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryBlobStore::new();
        store.put("a", b"hello").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemoryBlobStore::new();
        store.put("a", b"first").await.unwrap();
        store.put("a", b"second").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), b"second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = InMemoryBlobStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_present() {
        let store = InMemoryBlobStore::new();
        store.put("a", b"x").await.unwrap();
        store.delete("a").await.unwrap();
        assert!(store.get("a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_missing_is_reported() {
        let store = InMemoryBlobStore::new();
        let err = store.delete("never").await.unwrap_err();
        assert!(err.is_not_found());
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_is_complete() {
        let store = InMemoryBlobStore::new();
        store.put("a", b"1").await.unwrap();
        store.put("b", b"2").await.unwrap();
        store.put("c", b"3").await.unwrap();

        let mut keys = store.list().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_empty_store() {
        let store = InMemoryBlobStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn len_and_total_bytes() {
        let store = InMemoryBlobStore::new();
        assert!(store.is_empty());
        store.put("a", b"12345").await.unwrap();
        store.put("b", b"123456789").await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 14);
    }

    #[tokio::test]
    async fn clear_removes_all() {
        let store = InMemoryBlobStore::new();
        store.put("a", b"1").await.unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Concurrent access
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn concurrent_writers_last_wins() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryBlobStore::new());
        let mut handles = Vec::new();
        for i in 0..8u8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.put("shared", &[i]).await.unwrap();
            }));
        }
        for h in handles {
            h.await.expect("task should not panic");
        }
        // One of the writes won; the value is a single byte from a writer.
        let value = store.get("shared").await.unwrap();
        assert_eq!(value.len(), 1);
        assert!(value[0] < 8);
    }

    #[tokio::test]
    async fn debug_format() {
        let store = InMemoryBlobStore::new();
        store.put("x", b"y").await.unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlobStore"));
        assert!(debug.contains("blob_count"));
    }
}
