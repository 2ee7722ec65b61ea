//! One transform's pipeline: convert, inspect, stat, sniff, store.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vf_core::{Attachment, BlobDescriptor, Error, TransformSpec, VariantRecord};
use vf_magick::{build_convert_args, ImageEngine};

use crate::mime::MimeSniffer;
use crate::storage::StorageProvider;
use crate::temp::{normalize_extension, TempPathAllocator};

/// Where a unit is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStage {
    Pending,
    Converting,
    Inspecting,
    Stating,
    Sniffing,
    Storing,
    Committed,
    Failed,
}

impl fmt::Display for UnitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitStage::Pending => "pending",
            UnitStage::Converting => "converting",
            UnitStage::Inspecting => "inspecting",
            UnitStage::Stating => "stating",
            UnitStage::Sniffing => "sniffing",
            UnitStage::Storing => "storing",
            UnitStage::Committed => "committed",
            UnitStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Collaborators shared by every unit of a batch.
pub struct UnitContext {
    pub engine: Arc<dyn ImageEngine>,
    pub sniffer: Arc<dyn MimeSniffer>,
    pub storage: Arc<dyn StorageProvider>,
}

/// The end-to-end pipeline producing and persisting one variant.
///
/// A unit never touches the host model: on success it hands back a complete
/// [`VariantRecord`] for the caller to commit in one assignment.
#[derive(Debug)]
pub struct TransformUnit {
    name: String,
    source: PathBuf,
    variant_name: String,
    args: Vec<String>,
    output: PathBuf,
    keep_temp_file: bool,
    stage: UnitStage,
}

impl TransformUnit {
    /// Prepare a unit for `spec`, allocating its output path.
    ///
    /// The output extension is the transform's `format` when set, otherwise the
    /// attachment's own extension.
    pub fn new(
        name: impl Into<String>,
        attachment: &Attachment,
        spec: &TransformSpec,
        allocator: &TempPathAllocator,
    ) -> Self {
        let ext = spec
            .format()
            .or_else(|| attachment.extension())
            .unwrap_or_default();
        Self {
            name: name.into(),
            source: attachment.path.clone(),
            variant_name: variant_name(attachment, &ext),
            args: build_convert_args(spec),
            output: allocator.allocate(&ext),
            keep_temp_file: true,
            stage: UnitStage::Pending,
        }
    }

    /// Builder: delete the converted file once it has been stored.
    pub fn with_keep_temp_file(mut self, keep: bool) -> Self {
        self.keep_temp_file = keep;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> UnitStage {
        self.stage
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run all stages in order, stopping at the first failure.
    pub async fn run(&mut self, ctx: &UnitContext) -> vf_core::Result<VariantRecord> {
        let result = self.run_stages(ctx).await;
        match &result {
            Ok(_) => self.advance(UnitStage::Committed),
            Err(e) => {
                tracing::warn!(transform = %self.name, stage = %self.stage, "Transform failed: {e}");
                if !self.keep_temp_file {
                    self.discard_output().await;
                }
                self.advance(UnitStage::Failed);
            }
        }
        result
    }

    async fn run_stages(&mut self, ctx: &UnitContext) -> vf_core::Result<VariantRecord> {
        self.advance(UnitStage::Converting);
        ctx.engine
            .convert(&self.source, &self.args, &self.output)
            .await
            .map_err(|e| Error::conversion(&self.name, e))?;

        self.advance(UnitStage::Inspecting);
        let info = ctx
            .engine
            .identify(&self.output)
            .await
            .map_err(|e| Error::inspection(&self.name, e))?;

        self.advance(UnitStage::Stating);
        let size = tokio::fs::metadata(&self.output)
            .await
            .map_err(|e| Error::stat(&self.name, e))?
            .len();

        self.advance(UnitStage::Sniffing);
        let mime_type = ctx
            .sniffer
            .detect_file(&self.output)
            .await
            .map_err(|e| Error::sniff(&self.name, e))?;

        self.advance(UnitStage::Storing);
        let blob = BlobDescriptor {
            path: self.output.clone(),
            name: self.variant_name.clone(),
            size,
            mime_type: mime_type.clone(),
        };
        let url = ctx
            .storage
            .save(&blob)
            .await
            .map_err(|e| Error::storage(&self.name, e))?;

        if !self.keep_temp_file {
            self.discard_output().await;
        }

        Ok(VariantRecord {
            path: self.keep_temp_file.then(|| self.output.clone()),
            name: Some(self.variant_name.clone()),
            size: Some(size),
            mime_type: Some(mime_type),
            url: Some(url),
            format: Some(info.format),
            depth: Some(info.depth),
            width: Some(info.width),
            height: Some(info.height),
        })
    }

    async fn discard_output(&self) {
        match tokio::fs::remove_file(&self.output).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                transform = %self.name,
                "Failed to remove temp file {}: {e}",
                self.output.display()
            ),
        }
    }

    fn advance(&mut self, next: UnitStage) {
        tracing::debug!(transform = %self.name, "{} -> {}", self.stage, next);
        self.stage = next;
    }
}

/// Display name of a variant: the attachment's stem with the output extension.
fn variant_name(attachment: &Attachment, ext: &str) -> String {
    let stem = Path::new(&attachment.name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| attachment.name.clone());
    format!("{stem}{}", normalize_extension(ext))
}
