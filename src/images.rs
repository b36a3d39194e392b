//! Filesystem blob store for product images
//!
//! The catalog only ever holds an opaque path for a product image; this
//! module owns the bytes behind that path. Files are content-addressed
//! (SHA-256 of the bytes), so re-uploading the same image is a no-op and
//! paths never collide.

use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Filesystem-backed image store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open (and create if missing) the store directory.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store image bytes, returning the opaque reference to persist in the
    /// catalog (relative path under the store root).
    pub async fn save(&self, ext: &str, data: &[u8]) -> io::Result<String> {
        let hash = hex::encode(Sha256::digest(data));
        let file_name = format!("{hash}.{ext}");
        let full = self.root.join(&file_name);
        tokio::fs::write(&full, data).await?;
        Ok(file_name)
    }

    /// Reclaim a previously stored image by its opaque reference.
    ///
    /// References are single path components; anything else is rejected so a
    /// crafted catalog row cannot delete outside the store root.
    pub async fn remove(&self, reference: &str) -> io::Result<()> {
        let name = Path::new(reference);
        if reference.is_empty()
            || name.components().count() != 1
            || name.is_absolute()
            || reference.contains("..")
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid image reference",
            ));
        }
        tokio::fs::remove_file(self.root.join(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        let reference = store.save("jpg", b"not really a jpeg").await.unwrap();
        assert!(reference.ends_with(".jpg"));
        assert!(dir.path().join(&reference).exists());

        store.remove(&reference).await.unwrap();
        assert!(!dir.path().join(&reference).exists());
    }

    #[tokio::test]
    async fn save_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        let a = store.save("png", b"same bytes").await.unwrap();
        let b = store.save("png", b"same bytes").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn remove_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();

        assert!(store.remove("../etc/passwd").await.is_err());
        assert!(store.remove("/etc/passwd").await.is_err());
        assert!(store.remove("").await.is_err());
    }
}
