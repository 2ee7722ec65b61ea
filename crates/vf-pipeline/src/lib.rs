//! # vf-pipeline
//!
//! Orchestration of image-variant production for uploaded attachments.
//!
//! This crate provides:
//!
//! - **[`VariantProcessor`]** -- validates the source, runs one
//!   [`TransformUnit`] per configured transform concurrently, commits the
//!   results onto a [`VariantSet`](vf_core::VariantSet), removes stored
//!   variants, and contributes the per-transform field schema.
//! - **[`TransformUnit`]** -- convert, inspect, stat, sniff, store.
//! - **[`TempPathAllocator`]** -- random, collision-resistant output paths.
//! - **Seams** -- [`StorageProvider`] for blob stores and [`MimeSniffer`]
//!   (with the signature-table [`MagicSniffer`]) for content types.

pub mod mime;
pub mod processor;
pub mod storage;
pub mod temp;
pub mod unit;

// Re-export key types at the crate root.
pub use mime::{MagicSniffer, MimeSniffer};
pub use processor::VariantProcessor;
pub use storage::StorageProvider;
pub use temp::TempPathAllocator;
pub use unit::{TransformUnit, UnitContext, UnitStage};
