//! The storage backend seam.

use async_trait::async_trait;
use vf_core::{BlobDescriptor, VariantRecord};

/// Blob store that persists variants and hands back their public URL.
///
/// Providers are shared across concurrently running units and must be
/// reentrant. Errors are reported as plain [`vf_core::Error`]s; the pipeline
/// wraps them with the transform name.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Persist the file described by `blob` and return its URL.
    async fn save(&self, blob: &BlobDescriptor) -> vf_core::Result<String>;

    /// Delete a previously saved variant.
    async fn remove(&self, record: &VariantRecord) -> vf_core::Result<()>;
}
