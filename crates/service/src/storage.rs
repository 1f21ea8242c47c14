//! Image storage collaborator.
//!
//! The aggregate services only track filename references; byte persistence
//! is delegated to an [`ImageStore`] implementation. The stored reference is
//! a path relative to the store root (e.g. `house/<uuid>-plan.png`), so
//! deletion needs nothing but the reference itself.

use std::path::PathBuf;

use async_trait::async_trait;
use kvartal_core::error::CoreError;
use uuid::Uuid;

/// Which parent kind an image belongs to; selects the storage subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    House,
    Apartment,
}

impl ImageKind {
    fn subdir(self) -> &'static str {
        match self {
            ImageKind::House => "house",
            ImageKind::Apartment => "apartment",
        }
    }
}

/// An uploaded image payload handed to the aggregate services.
#[derive(Debug, Clone)]
pub struct NewImageUpload {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

/// Byte-persistence collaborator for house/apartment images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist image bytes, returning the stored reference.
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        kind: ImageKind,
    ) -> Result<String, CoreError>;

    /// Delete a stored image. A missing reference is not an error.
    async fn delete(&self, stored: &str) -> Result<(), CoreError>;
}

/// Filesystem-backed image store rooted at `base_dir`.
///
/// Stored names are prefixed with a UUID so repeated uploads of the same
/// original filename never collide.
pub struct LocalImageStore {
    base_dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Build from the `IMAGE_STORAGE_DIR` environment variable
    /// (default: `images`).
    pub fn from_env() -> Self {
        let base_dir = std::env::var("IMAGE_STORAGE_DIR").unwrap_or_else(|_| "images".into());
        Self::new(base_dir)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        kind: ImageKind,
    ) -> Result<String, CoreError> {
        let dir = self.base_dir.join(kind.subdir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create image directory: {e}")))?;

        // Strip any path components a client may have smuggled into the name.
        let file_name = original_name.rsplit(['/', '\\']).next().unwrap_or("image");
        let stored = format!("{}/{}-{}", kind.subdir(), Uuid::new_v4(), file_name);

        tokio::fs::write(self.base_dir.join(&stored), bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to store image: {e}")))?;
        Ok(stored)
    }

    async fn delete(&self, stored: &str) -> Result<(), CoreError> {
        match tokio::fs::remove_file(self.base_dir.join(stored)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!("Failed to delete image: {e}"))),
        }
    }
}
