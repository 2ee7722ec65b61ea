//! # vf-magick
//!
//! External image tool management for the variantforge pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find `gm`, `magick`, `convert`
//!   and `identify` for the selected [`Dialect`].
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **The engine seam** ([`ImageEngine`]) and its process-backed
//!   implementation ([`MagickEngine`]).
//! - **Argument building** ([`build_convert_args`]) from declarative
//!   transform specs.

pub mod args;
pub mod command;
pub mod engine;
pub mod tools;

// ---- Re-exports for convenience ----

pub use args::build_convert_args;
pub use command::{ToolCommand, ToolOutput};
pub use engine::{parse_identify, ImageEngine, MagickEngine};
pub use tools::{Dialect, ToolInfo, ToolRegistry};
