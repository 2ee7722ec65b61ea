//! Content-based MIME detection.
//!
//! The type of a converted variant is decided from its leading bytes, never
//! from its extension.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

/// How many leading bytes the signature table needs.
const SNIFF_LEN: usize = 32;

/// Returned when no signature matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returned for zero-length files.
pub const EMPTY: &str = "application/x-empty";

/// Detect the MIME type of a file from its contents.
#[async_trait]
pub trait MimeSniffer: Send + Sync {
    async fn detect_file(&self, path: &Path) -> vf_core::Result<String>;
}

/// [`MimeSniffer`] backed by a table of magic-byte signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

#[async_trait]
impl MimeSniffer for MagicSniffer {
    async fn detect_file(&self, path: &Path) -> vf_core::Result<String> {
        let mut file = tokio::fs::File::open(path).await?;
        let mut buf = [0u8; SNIFF_LEN];
        let mut filled = 0;
        while filled < SNIFF_LEN {
            let n = file.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(sniff_bytes(&buf[..filled]).to_string())
    }
}

/// Match `head` against the known signatures.
pub fn sniff_bytes(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return EMPTY;
    }

    match head {
        [0xFF, 0xD8, 0xFF, ..] => return "image/jpeg",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => return "image/png",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => return "image/gif",
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => return "image/tiff",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => return "image/webp",
        [b'B', b'M', ..] => return "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => return "image/x-icon",
        [b'8', b'B', b'P', b'S', ..] => return "image/vnd.adobe.photoshop",
        [b'%', b'P', b'D', b'F', ..] => return "application/pdf",
        [0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ', ..] => return "image/jp2",
        _ => {}
    }

    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        match &head[8..12] {
            b"avif" | b"avis" => return "image/avif",
            b"heic" | b"heix" | b"mif1" | b"msf1" => return "image/heic",
            _ => {}
        }
    }

    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    if trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg")) {
        return "image/svg+xml";
    }

    OCTET_STREAM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_image_types() {
        assert_eq!(sniff_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), "image/jpeg");
        assert_eq!(
            sniff_bytes(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            "image/png"
        );
        assert_eq!(sniff_bytes(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(sniff_bytes(b"GIF87a\x01\x00"), "image/gif");
        assert_eq!(sniff_bytes(b"II*\x00\x08\x00"), "image/tiff");
        assert_eq!(sniff_bytes(b"MM\x00*\x00\x00"), "image/tiff");
        assert_eq!(sniff_bytes(b"RIFF\x10\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_bytes(b"\x00\x00\x00\x1cftypavif"), "image/avif");
    }

    #[test]
    fn extension_is_irrelevant() {
        // Bytes decide, not names: a PNG header is PNG whatever it's called.
        assert_eq!(sniff_bytes(b"\x89PNG\r\n\x1a\n"), "image/png");
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(sniff_bytes(b"hello world"), OCTET_STREAM);
        assert_eq!(sniff_bytes(b""), EMPTY);
    }

    #[test]
    fn svg_text() {
        assert_eq!(sniff_bytes(b"<svg xmlns="), "image/svg+xml");
        assert_eq!(sniff_bytes(b"<?xml version=\"1.0\"?><svg"), "image/svg+xml");
    }

    #[tokio::test]
    async fn detect_file_reads_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.txt");
        std::fs::write(&path, b"GIF89a\x01\x00\x01\x00\x00\x00\x00;").unwrap();
        let mime = MagicSniffer.detect_file(&path).await.unwrap();
        assert_eq!(mime, "image/gif");
    }

    #[tokio::test]
    async fn detect_missing_file_errors() {
        let result = MagicSniffer
            .detect_file(Path::new("/nonexistent/variant.png"))
            .await;
        assert!(matches!(result, Err(vf_core::Error::Io { .. })));
    }
}
