//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which owns a scratch directory holding the temp
//! dir, the local store, and a source image, plus [`FakeEngine`], an
//! [`ImageEngine`] that writes tiny PNG files instead of shelling out.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use variantforge::LocalStorage;
use vf_core::{Attachment, Error, ImageInfo, ProcessorConfig, TransformSpec};
use vf_magick::ImageEngine;
use vf_pipeline::{MagicSniffer, VariantProcessor};

/// PNG signature followed by a fake body.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR fake";

/// Engine that reports the source as a PNG and "converts" by writing
/// [`PNG_BYTES`] to the output. Any argument equal to `fail_token` makes the
/// conversion fail; `skip_write` makes it succeed without an output file.
pub struct FakeEngine {
    pub source_format: String,
    pub fail_token: Option<String>,
    pub skip_write: bool,
}

impl FakeEngine {
    pub fn png() -> Self {
        Self {
            source_format: "PNG".into(),
            fail_token: None,
            skip_write: false,
        }
    }

    pub fn failing_on(token: &str) -> Self {
        Self {
            fail_token: Some(token.into()),
            ..Self::png()
        }
    }
}

#[async_trait]
impl ImageEngine for FakeEngine {
    async fn identify(&self, _path: &Path) -> vf_core::Result<ImageInfo> {
        Ok(ImageInfo {
            format: self.source_format.clone(),
            depth: 8,
            width: 32,
            height: 16,
        })
    }

    async fn convert(&self, _input: &Path, args: &[String], output: &Path) -> vf_core::Result<()> {
        if let Some(token) = &self.fail_token {
            if args.iter().any(|a| a == token) {
                return Err(Error::tool("convert", format!("refused {token}")));
            }
        }
        if !self.skip_write {
            tokio::fs::write(output, PNG_BYTES).await?;
        }
        Ok(())
    }
}

/// Scratch workspace for one test.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.dir.path().join("tmp")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// Write a source image and return it as an attachment.
    pub fn source(&self, name: &str) -> Attachment {
        let path = self.dir.path().join(name);
        std::fs::write(&path, PNG_BYTES).expect("failed to write source");
        Attachment::from_path(path)
    }

    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::new(LocalStorage::new(self.store_dir(), "/variants"))
    }

    /// Config with a `thumb` and a `large` transform.
    pub fn config(&self) -> ProcessorConfig {
        ProcessorConfig {
            tmp_dir: Some(self.tmp_dir()),
            ..Default::default()
        }
        .transform(
            "thumb",
            TransformSpec::new()
                .option("resize", "64x64")
                .option("format", "png"),
        )
        .transform("large", TransformSpec::new().option("resize", "1024x1024>"))
    }

    pub fn processor(&self, config: ProcessorConfig, engine: FakeEngine) -> VariantProcessor {
        VariantProcessor::with_engine(config, Arc::new(engine), Arc::new(MagicSniffer))
            .expect("failed to build processor")
    }

    /// Number of files currently in the local store.
    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.store_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
