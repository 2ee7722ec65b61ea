//! Attachment, variant metadata, and the host-side variant model.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An uploaded source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filesystem location of the upload.
    pub path: PathBuf,
    /// Original filename as supplied by the uploader.
    pub name: String,
}

impl Attachment {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Build an attachment whose name is the file name of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, name }
    }

    /// Extension of the source (without dot), taken from the path and
    /// falling back to the original name.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path).or_else(|| extension_of(Path::new(&self.name)))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_string())
        .filter(|e| !e.is_empty())
}

/// Attributes reported by the conversion engine's identify capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Engine format name, e.g. `JPEG`.
    pub format: String,
    /// Bits per channel.
    pub depth: u32,
    pub width: u32,
    pub height: u32,
}

/// What a storage provider receives when saving a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescriptor {
    /// Local file holding the variant bytes.
    pub path: PathBuf,
    /// Display name for the stored variant.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Sniffed MIME type.
    pub mime_type: String,
}

/// Per-transform metadata stored on the host model.
///
/// Every field is optional: a record that was never committed is all-`None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl VariantRecord {
    /// Whether a blob was stored for this record (a non-empty URL is set).
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// The host model: one [`VariantRecord`] per transform name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSet(IndexMap<String, VariantRecord>);

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `name`, if one exists.
    pub fn get(&self, name: &str) -> Option<&VariantRecord> {
        self.0.get(name)
    }

    /// Mutable access to the record for `name`, creating an empty one.
    pub fn entry(&mut self, name: &str) -> &mut VariantRecord {
        self.0.entry(name.to_string()).or_default()
    }

    /// Replace the record for `name` in one assignment.
    pub fn commit(&mut self, name: &str, record: VariantRecord) {
        *self.entry(name) = record;
    }

    /// Whether `name` has a stored blob.
    pub fn has_url(&self, name: &str) -> bool {
        self.get(name).is_some_and(VariantRecord::has_url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariantRecord)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_path() {
        let a = Attachment::new("/uploads/abc123.png", "holiday.jpg");
        assert_eq!(a.extension().as_deref(), Some("png"));
    }

    #[test]
    fn extension_falls_back_to_name() {
        let a = Attachment::new("/uploads/abc123", "holiday.jpg");
        assert_eq!(a.extension().as_deref(), Some("jpg"));

        let none = Attachment::new("/uploads/abc123", "holiday");
        assert_eq!(none.extension(), None);
    }

    #[test]
    fn from_path_uses_file_name() {
        let a = Attachment::from_path("/tmp/photo.gif");
        assert_eq!(a.name, "photo.gif");
    }

    #[test]
    fn has_url_ignores_empty() {
        let mut record = VariantRecord::default();
        assert!(!record.has_url());
        record.url = Some(String::new());
        assert!(!record.has_url());
        record.url = Some("https://cdn.example.com/a.png".into());
        assert!(record.has_url());
    }

    #[test]
    fn commit_replaces_whole_record() {
        let mut set = VariantSet::new();
        set.entry("thumb").width = Some(10);
        set.commit(
            "thumb",
            VariantRecord {
                url: Some("u".into()),
                ..Default::default()
            },
        );
        let thumb = set.get("thumb").unwrap();
        assert_eq!(thumb.width, None);
        assert!(set.has_url("thumb"));
        assert!(!set.has_url("missing"));
    }

    #[test]
    fn record_serializes_type_field() {
        let record = VariantRecord {
            mime_type: Some("image/png".into()),
            width: Some(32),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "image/png");
        assert_eq!(json["width"], 32);
        assert!(json.get("url").is_none());
    }
}
