//! variantforge - derive, store, and remove image variants of uploads
//!
//! This library crate wires the vf-* crates to a TOML configuration file and
//! a local filesystem storage provider, and exposes them for integration
//! testing.

pub mod config;
pub mod storage;

pub use config::{load_config, load_config_or_default, parse_config, Config, StorageConfig};
pub use storage::LocalStorage;
