//! Local filesystem [`StorageProvider`].
//!
//! Variants are copied into a root directory under their (random) temp file
//! name and addressed as `{base_url}/{file_name}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vf_core::{BlobDescriptor, Error, VariantRecord};
use vf_pipeline::StorageProvider;

/// Stores variants as plain files below `root`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL of a stored file.
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, file_name)
    }

    /// Local path behind a URL issued by [`url_for`](Self::url_for).
    ///
    /// Returns `None` for foreign URLs and for names that would escape `root`.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn save(&self, blob: &BlobDescriptor) -> vf_core::Result<String> {
        let file_name = blob
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::Internal(format!("blob path {} has no file name", blob.path.display()))
            })?;

        tokio::fs::create_dir_all(&self.root).await?;
        let dest = self.root.join(&file_name);
        tokio::fs::copy(&blob.path, &dest).await?;

        tracing::debug!(
            "Stored {} ({} bytes, {}) at {}",
            blob.name,
            blob.size,
            blob.mime_type,
            dest.display()
        );
        Ok(self.url_for(&file_name))
    }

    async fn remove(&self, record: &VariantRecord) -> vf_core::Result<()> {
        let url = record.url.as_deref().unwrap_or_default();
        let path = self.path_for(url).ok_or_else(|| {
            Error::Internal(format!("{url} is not served from {}", self.base_url))
        })?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
