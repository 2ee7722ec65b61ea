//! The conversion engine seam and its GraphicsMagick/ImageMagick backend.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use vf_core::ImageInfo;

use crate::tools::ToolRegistry;

/// `identify -format` template: format, depth, width, height.
const IDENTIFY_FORMAT: &str = "%m %z %w %h\n";

/// Inspect and convert image files.
///
/// Implementations must be safe to call concurrently from many tasks.
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Report format, depth, and pixel dimensions of the image at `path`.
    async fn identify(&self, path: &Path) -> vf_core::Result<ImageInfo>;

    /// Convert `input` with `args` and write the result to `output`.
    async fn convert(&self, input: &Path, args: &[String], output: &Path) -> vf_core::Result<()>;
}

/// [`ImageEngine`] that shells out to `gm` or ImageMagick.
#[derive(Debug, Clone)]
pub struct MagickEngine {
    tools: Arc<ToolRegistry>,
}

impl MagickEngine {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

#[async_trait]
impl ImageEngine for MagickEngine {
    async fn identify(&self, path: &Path) -> vf_core::Result<ImageInfo> {
        let mut cmd = self.tools.identify_command()?;
        // Only the first frame of animated or multi-page images.
        cmd.arg("-format")
            .arg(IDENTIFY_FORMAT)
            .arg(format!("{}[0]", path.display()));
        let output = cmd.execute().await?;
        parse_identify(&output.stdout)
            .ok_or_else(|| {
                vf_core::Error::tool(
                    cmd.program_name(),
                    format!(
                        "unexpected identify output for {}: {:?}",
                        path.display(),
                        output.stdout.trim()
                    ),
                )
            })
    }

    async fn convert(&self, input: &Path, args: &[String], output: &Path) -> vf_core::Result<()> {
        let mut cmd = self.tools.convert_command()?;
        cmd.arg(input.to_string_lossy())
            .args(args.iter().cloned())
            .arg(output.to_string_lossy());
        cmd.execute().await?;
        Ok(())
    }
}

/// Parse the first line of `identify -format "%m %z %w %h"` output.
pub fn parse_identify(stdout: &str) -> Option<ImageInfo> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut parts = line.split_whitespace();
    let format = parts.next()?.to_string();
    let depth = parts.next()?.parse().ok()?;
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ImageInfo {
        format,
        depth,
        width,
        height,
    })
}
