//! vf-core: shared types, errors, and configuration for variantforge.
//!
//! This crate is the foundational dependency for the other vf-* crates,
//! providing the unified error type, transform specifications, the
//! attachment and variant-record model, and field-shape descriptors.

pub mod config;
pub mod error;
pub mod schema;
pub mod transform;
pub mod variant;

// Re-export the most commonly used items at the crate root.
pub use config::{ProcessorConfig, ToolsConfig, DEFAULT_FORMATS};
pub use error::{Error, Result};
pub use schema::{FieldKind, FieldShape};
pub use transform::{OptionValue, Scalar, TransformSpec, TransformsConfig, FORMAT_KEY};
pub use variant::{Attachment, BlobDescriptor, ImageInfo, VariantRecord, VariantSet};
