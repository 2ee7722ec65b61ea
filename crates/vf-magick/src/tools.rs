//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers the GraphicsMagick or ImageMagick binaries
//! for the selected [`Dialect`] and hands out pre-configured
//! [`ToolCommand`]s for the `convert` and `identify` operations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vf_core::ToolsConfig;

use crate::command::ToolCommand;

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["gm", "magick", "convert", "identify"];

/// Which command-line dialect the conversion engine speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `gm convert` / `gm identify`.
    GraphicsMagick,
    /// `magick` (v7) or the legacy `convert` / `identify` pair (v6).
    ImageMagick,
}

impl Dialect {
    /// Dialect selected by the `image_magick` configuration flag.
    pub fn from_flag(image_magick: bool) -> Self {
        if image_magick {
            Dialect::ImageMagick
        } else {
            Dialect::GraphicsMagick
        }
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool paths.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    dialect: Dialect,
    tools: HashMap<String, PathBuf>,
    timeout: Duration,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// A configured path is used when it exists; otherwise [`which::which`]
    /// locates the tool. Tools that are not found are omitted.
    pub fn discover(tools_config: &ToolsConfig, dialect: Dialect) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "gm" => tools_config.gm_path.as_deref(),
                "magick" => tools_config.magick_path.as_deref(),
                "convert" => tools_config.convert_path.as_deref(),
                "identify" => tools_config.identify_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured {name} path {} does not exist; searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(name.to_string(), path);
            }
        }

        Self {
            dialect,
            tools,
            timeout: Duration::from_secs(tools_config.timeout_secs),
        }
    }

    /// Build a registry from explicit paths, bypassing discovery.
    pub fn from_paths(
        dialect: Dialect,
        paths: impl IntoIterator<Item = (String, PathBuf)>,
        timeout: Duration,
    ) -> Self {
        Self {
            dialect,
            tools: paths.into_iter().collect(),
            timeout,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Path of the given tool, or [`vf_core::Error::Tool`] if it was not found.
    pub fn require(&self, name: &str) -> vf_core::Result<&Path> {
        self.tools.get(name).map(PathBuf::as_path).ok_or_else(|| {
            vf_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// A command prepared to run a conversion: append input, options, output.
    pub fn convert_command(&self) -> vf_core::Result<ToolCommand> {
        match self.dialect {
            Dialect::GraphicsMagick => self.subcommand("gm", "convert"),
            Dialect::ImageMagick => {
                if let Ok(magick) = self.require("magick") {
                    Ok(self.command(magick))
                } else {
                    Ok(self.command(self.require("convert")?))
                }
            }
        }
    }

    /// A command prepared to identify a file: append the format and path.
    pub fn identify_command(&self) -> vf_core::Result<ToolCommand> {
        match self.dialect {
            Dialect::GraphicsMagick => self.subcommand("gm", "identify"),
            Dialect::ImageMagick => {
                if self.tools.contains_key("magick") {
                    self.subcommand("magick", "identify")
                } else {
                    Ok(self.command(self.require("identify")?))
                }
            }
        }
    }

    fn subcommand(&self, tool: &str, sub: &str) -> vf_core::Result<ToolCommand> {
        let mut cmd = self.command(self.require(tool)?);
        cmd.arg(sub);
        Ok(cmd)
    }

    fn command(&self, program: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(program.to_path_buf());
        cmd.timeout(self.timeout);
        cmd
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| {
                if let Some(path) = self.tools.get(name) {
                    ToolInfo {
                        name: name.to_string(),
                        available: true,
                        version: detect_version(name, path),
                        path: Some(path.clone()),
                    }
                } else {
                    ToolInfo {
                        name: name.to_string(),
                        available: false,
                        version: None,
                        path: None,
                    }
                }
            })
            .collect()
    }
}

/// Run the tool's version command and return the first line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        "gm" => "version",
        _ => "-version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.trim().to_string())
}
