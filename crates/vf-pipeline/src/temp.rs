//! Collision-resistant output paths for converted variants.

use std::path::{Path, PathBuf};

/// Random bytes per name; hex-encoded to 20 characters.
const NAME_BYTES: usize = 10;

/// Hands out unique file paths inside a shared temp directory.
///
/// Uniqueness rests on 80 random bits per name, not on locking, so any
/// number of units and processors may share one directory.
#[derive(Debug, Clone)]
pub struct TempPathAllocator {
    dir: PathBuf,
}

impl TempPathAllocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocate `{dir}/{random20}{.ext}`.
    ///
    /// `ext` may be given with or without its leading dot; an empty `ext`
    /// produces a bare name.
    pub fn allocate(&self, ext: &str) -> PathBuf {
        let bytes: [u8; NAME_BYTES] = rand::random();
        let mut name = hex::encode(bytes);
        name.push_str(&normalize_extension(ext));
        self.dir.join(name)
    }
}

/// Ensure a non-empty extension starts with exactly one dot.
pub fn normalize_extension(ext: &str) -> String {
    let bare = ext.trim().trim_start_matches('.');
    if bare.is_empty() {
        String::new()
    } else {
        format!(".{bare}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn name_is_twenty_lowercase_hex() {
        let alloc = TempPathAllocator::new("/tmp/variants");
        let path = alloc.allocate("png");
        assert_eq!(path.parent(), Some(Path::new("/tmp/variants")));
        let stem = path.file_stem().unwrap().to_str().unwrap();
        assert_eq!(stem.len(), 20);
        assert!(stem
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(path.extension().unwrap(), "png");
    }

    #[test]
    fn extension_gets_single_dot() {
        assert_eq!(normalize_extension("jpg"), ".jpg");
        assert_eq!(normalize_extension(".jpg"), ".jpg");
        assert_eq!(normalize_extension("..jpg"), ".jpg");
        assert_eq!(normalize_extension(""), "");
        assert_eq!(normalize_extension("."), "");
    }

    #[test]
    fn bare_name_without_extension() {
        let path = TempPathAllocator::new("/tmp").allocate("");
        assert!(path.extension().is_none());
        assert_eq!(path.file_name().unwrap().len(), 20);
    }

    #[test]
    fn ten_thousand_allocations_are_unique() {
        let alloc = TempPathAllocator::new("/tmp");
        let paths: HashSet<PathBuf> = (0..10_000).map(|_| alloc.allocate(".gif")).collect();
        assert_eq!(paths.len(), 10_000);
        assert!(paths
            .iter()
            .all(|p| p.to_string_lossy().ends_with(".gif")));
    }
}
