//! Processor configuration types.
//!
//! [`ProcessorConfig`] is deserialized from the host's configuration file.
//! Everything except `transforms` has a default, and [`ProcessorConfig::validate`]
//! rejects a config without transforms.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::transform::{TransformSpec, TransformsConfig};
use crate::Error;

/// Source formats accepted when `formats` is not configured.
pub const DEFAULT_FORMATS: &[&str] = &["JPEG", "PNG", "GIF", "TIFF"];

/// Default external tool timeout in seconds.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// ProcessorConfig
// ---------------------------------------------------------------------------

/// Construction options for a variant processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Named transforms, in the order they were declared.
    pub transforms: TransformsConfig,
    /// Directory for converted outputs; the system temp dir when unset.
    pub tmp_dir: Option<PathBuf>,
    /// Allow-list of source formats (engine format names).
    pub formats: Vec<String>,
    /// Target the ImageMagick command dialect instead of GraphicsMagick.
    pub image_magick: bool,
    /// Abort still-running transforms once one has failed.
    pub abort_siblings_on_failure: bool,
    /// Leave converted files in `tmp_dir` after they were stored.
    pub keep_temp_files: bool,
    pub tools: ToolsConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            transforms: TransformsConfig::new(),
            tmp_dir: None,
            formats: DEFAULT_FORMATS.iter().map(|f| (*f).to_string()).collect(),
            image_magick: false,
            abort_siblings_on_failure: false,
            keep_temp_files: true,
            tools: ToolsConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Start a config from a set of transforms, everything else defaulted.
    pub fn with_transforms(transforms: TransformsConfig) -> Self {
        Self {
            transforms,
            ..Self::default()
        }
    }

    /// Builder: add a named transform.
    pub fn transform(mut self, name: impl Into<String>, spec: TransformSpec) -> Self {
        self.transforms.insert(name.into(), spec);
        self
    }

    /// The temp directory to write variants into.
    pub fn resolved_tmp_dir(&self) -> PathBuf {
        self.tmp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Whether `format` (as reported by identify) is on the allow-list.
    pub fn accepts_format(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f.eq_ignore_ascii_case(format))
    }

    /// Reject configurations the processor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.transforms.is_empty() {
            return Err(Error::configuration("transforms is required"));
        }
        if let Some(name) = self.transforms.keys().find(|n| n.trim().is_empty()) {
            return Err(Error::configuration(format!(
                "transform name {name:?} is blank"
            )));
        }
        if self.formats.is_empty() {
            return Err(Error::configuration("formats must not be empty"));
        }
        Ok(())
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, spec) in &self.transforms {
            if spec.options().next().is_none() {
                warnings.push(format!(
                    "transform {name:?} has no conversion options; the source is copied as-is"
                ));
            }
        }

        if let Some(dir) = &self.tmp_dir {
            if dir.is_relative() {
                warnings.push(format!(
                    "tmp_dir {} is relative to the working directory",
                    dir.display()
                ));
            }
        }

        if self.tools.timeout_secs == 0 {
            warnings.push("tools.timeout_secs is 0; every tool call will time out".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// ToolsConfig
// ---------------------------------------------------------------------------

/// Optional overrides for external tool locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub gm_path: Option<PathBuf>,
    pub magick_path: Option<PathBuf>,
    pub convert_path: Option<PathBuf>,
    pub identify_path: Option<PathBuf>,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            gm_path: None,
            magick_path: None,
            convert_path: None,
            identify_path: None,
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ProcessorConfig::default();
        assert_eq!(cfg.formats, vec!["JPEG", "PNG", "GIF", "TIFF"]);
        assert!(!cfg.image_magick);
        assert!(cfg.keep_temp_files);
        assert_eq!(cfg.tools.timeout_secs, 300);
        assert_eq!(cfg.resolved_tmp_dir(), std::env::temp_dir());
    }

    #[test]
    fn missing_transforms_is_an_error() {
        let err = ProcessorConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("transforms"));
    }

    #[test]
    fn blank_transform_name_is_an_error() {
        let cfg = ProcessorConfig::default().transform(" ", TransformSpec::new());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn accepts_format_case_insensitive() {
        let cfg = ProcessorConfig::default();
        assert!(cfg.accepts_format("jpeg"));
        assert!(cfg.accepts_format("PNG"));
        assert!(!cfg.accepts_format("BMP"));
    }

    #[test]
    fn parses_toml_with_ordered_transforms() {
        let src = r#"
            tmp_dir = "/var/tmp/variants"
            image_magick = true

            [transforms.thumbnail]
            resize = "150x150"
            format = "png"

            [transforms.large]
            resize = "1024x1024>"

            [tools]
            gm_path = "/opt/gm/bin/gm"
        "#;
        let cfg: ProcessorConfig = toml::from_str(src).unwrap();
        cfg.validate().unwrap();
        let names: Vec<&str> = cfg.transforms.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["thumbnail", "large"]);
        assert!(cfg.image_magick);
        assert_eq!(cfg.formats.len(), 4);
        assert_eq!(cfg.tools.gm_path, Some(PathBuf::from("/opt/gm/bin/gm")));
        assert_eq!(cfg.tools.timeout_secs, 300);
    }

    #[test]
    fn warns_on_empty_transform() {
        let cfg = ProcessorConfig::default().transform("copy", TransformSpec::new());
        let warnings = cfg.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("copy"));
    }
}
