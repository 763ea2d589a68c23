use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Filesystem-backed blob store: one file per key under a root directory.
///
/// This is the offline ("airplane mode") backend. Keys may contain `/`,
/// which maps to subdirectories; parent directories are created on demand so
/// the implicit-namespace contract matches the networked object store
/// byte for byte. Keys that are empty, absolute, or traverse outside the
/// root are rejected with [`BlobError::InvalidKey`].
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        tracing::debug!("opened filesystem blob store at {}", root.display());
        Ok(Self { root })
    }

    /// The root directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> BlobResult<PathBuf> {
        if key.is_empty() {
            return Err(BlobError::InvalidKey {
                key: key.to_string(),
                reason: "empty key".to_string(),
            });
        }
        let relative = Path::new(key);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(BlobError::InvalidKey {
                        key: key.to_string(),
                        reason: "key must be a plain relative path".to_string(),
                    })
                }
            }
        }
        Ok(self.root.join(relative))
    }

    fn key_for(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(BlobError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> BlobResult<Vec<String>> {
        // Iterative walk; every regular file under the root is a key.
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    keys.push(self.key_for(&entry.path()));
                }
            }
        }
        Ok(keys)
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsBlobStore::open(dir.path().join("blobs")).unwrap();
        (dir, store)
    }

    // -----------------------------------------------------------------------
    // Contract parity with the in-memory backend
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_and_get() {
        let (_dir, store) = store();
        store.put("a", b"hello").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn put_overwrites() {
        let (_dir, store) = store();
        store.put("a", b"first").await.unwrap();
        store.put("a", b"second").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(store.get("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_present_then_missing() {
        let (_dir, store) = store();
        store.put("a", b"x").await.unwrap();
        store.delete("a").await.unwrap();
        assert!(store.get("a").await.unwrap_err().is_not_found());
        assert!(store.delete("a").await.unwrap_err().is_not_found());
    }

    // -----------------------------------------------------------------------
    // Implicit namespaces
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn nested_key_creates_parents() {
        let (_dir, store) = store();
        store.put("records/2026/abc", b"deep").await.unwrap();
        assert_eq!(store.get("records/2026/abc").await.unwrap(), b"deep");
    }

    #[tokio::test]
    async fn list_walks_nested_keys() {
        let (_dir, store) = store();
        store.put("a", b"1").await.unwrap();
        store.put("x/b", b"2").await.unwrap();
        store.put("x/y/c", b"3").await.unwrap();

        let mut keys = store.list().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "x/b", "x/y/c"]);
    }

    #[tokio::test]
    async fn list_empty_store() {
        let (_dir, store) = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Key validation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn rejects_traversal_key() {
        let (_dir, store) = store();
        let err = store.put("../escape", b"x").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn rejects_absolute_key() {
        let (_dir, store) = store();
        let err = store.get("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn rejects_empty_key() {
        let (_dir, store) = store();
        let err = store.delete("").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidKey { .. }));
    }

    // -----------------------------------------------------------------------
    // Byte fidelity
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn round_trips_arbitrary_bytes() {
        let (_dir, store) = store();
        let bytes: Vec<u8> = (0..=255).collect();
        store.put("binary", &bytes).await.unwrap();
        assert_eq!(store.get("binary").await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn reopen_sees_existing_blobs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("blobs");
        {
            let store = FsBlobStore::open(&root).unwrap();
            store.put("persisted", b"still here").await.unwrap();
        }
        let store = FsBlobStore::open(&root).unwrap();
        assert_eq!(store.get("persisted").await.unwrap(), b"still here");
    }
}
