//! Field-shape descriptors a host model embeds for each transform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primitive type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
}

/// Ordered field name -> kind map describing one sub-record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldShape(IndexMap<String, FieldKind>);

impl FieldShape {
    /// The generic file-attachment shape: `path`, `name`, `size`, `type`, `url`.
    pub fn file() -> Self {
        Self::default()
            .field("path", FieldKind::Text)
            .field("name", FieldKind::Text)
            .field("size", FieldKind::Integer)
            .field("type", FieldKind::Text)
            .field("url", FieldKind::Text)
    }

    /// The file shape extended with image attributes.
    pub fn image_variant() -> Self {
        Self::file()
            .field("format", FieldKind::Text)
            .field("depth", FieldKind::Integer)
            .field("width", FieldKind::Integer)
            .field("height", FieldKind::Integer)
    }

    /// Builder: add or replace a field.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.0.insert(name.into(), kind);
        self
    }

    pub fn get(&self, name: &str) -> Option<FieldKind> {
        self.0.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
