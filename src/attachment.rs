//! Attachment intake.
//!
//! Turns a locally picked file into an [`AttachmentDescriptor`] without
//! uploading anything. The file bytes stay where they are; the session only
//! holds a transient reference URL that resolves back to the local path for
//! as long as the [`ReferenceRegistry`] keeps it alive.

use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::models::MessageKind;

const BYTES_PER_MB: f64 = 1_048_576.0;
const REFERENCE_PREFIX: &str = "blob:cyberchat/";
const OCTET_STREAM: &str = "application/octet-stream";

/// A file chosen by the user, with the media type the picker declared for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub media_type: String,
}

impl PickedFile {
    /// Declares the media type from the file extension, the way a
    /// platform file picker would.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = media_type_for_path(&path).to_string();
        PickedFile { path, media_type }
    }

    pub fn with_media_type(path: impl Into<PathBuf>, media_type: &str) -> Self {
        PickedFile {
            path: path.into(),
            media_type: media_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    pub kind: MessageKind,
    pub name: String,
    pub size: String,
    pub url: Option<String>,
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

/// Only the media type prefix matters.
pub fn kind_for_media_type(media_type: &str) -> MessageKind {
    if media_type.starts_with("image/") {
        MessageKind::Image
    } else if media_type.starts_with("video/") {
        MessageKind::Video
    } else {
        MessageKind::File
    }
}

/// Always megabytes with two decimals, no KB/GB tiering.
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

/// Reads the file metadata and registers a transient reference for it.
pub fn intake(picked: &PickedFile, refs: &mut ReferenceRegistry) -> Result<AttachmentDescriptor> {
    let metadata = fs::metadata(&picked.path).map_err(|source| ChatError::Attachment {
        path: picked.path.clone(),
        source,
    })?;

    let name = picked
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| picked.path.display().to_string());

    let kind = kind_for_media_type(&picked.media_type);
    let size = format_size(metadata.len());
    let url = refs.acquire(&picked.path);

    debug!(
        "Attachment intake: {} ({}, {}, {}) -> {}",
        name, picked.media_type, kind, size, url
    );

    Ok(AttachmentDescriptor {
        kind,
        name,
        size,
        url: Some(url),
    })
}

/// Session-scoped table of transient file references.
///
/// References live until released explicitly or until the registry is
/// dropped, which releases everything still held.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    entries: HashMap<String, PathBuf>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, path: &Path) -> String {
        let url = format!("{}{}", REFERENCE_PREFIX, Uuid::new_v4());
        self.entries.insert(url.clone(), path.to_path_buf());
        url
    }

    pub fn resolve(&self, url: &str) -> Option<&Path> {
        self.entries.get(url).map(PathBuf::as_path)
    }

    pub fn release(&mut self, url: &str) -> bool {
        let released = self.entries.remove(url).is_some();
        if released {
            debug!("Released transient reference {}", url);
        }
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases every live reference and returns how many there were.
    pub fn release_all(&mut self) -> usize {
        let count = self.entries.len();
        if count > 0 {
            info!("Releasing {} transient file reference(s)", count);
            self.entries.clear();
        }
        count
    }
}

impl Drop for ReferenceRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_size_is_always_megabytes() {
        assert_eq!(format_size(2_621_440), "2.50 MB");
        assert_eq!(format_size(0), "0.00 MB");
        // Small files still report in MB
        assert_eq!(format_size(1024), "0.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5120.00 MB");
    }

    #[test]
    fn test_kind_from_media_type_prefix() {
        assert_eq!(kind_for_media_type("image/png"), MessageKind::Image);
        assert_eq!(kind_for_media_type("video/mp4"), MessageKind::Video);
        assert_eq!(kind_for_media_type("application/pdf"), MessageKind::File);
        assert_eq!(kind_for_media_type(""), MessageKind::File);
        // Prefix match only, not a substring search
        assert_eq!(kind_for_media_type("application/x-image/"), MessageKind::File);
    }

    #[test]
    fn test_declared_type_from_extension() {
        assert_eq!(PickedFile::from_path("holiday.JPG").media_type, "image/jpeg");
        assert_eq!(PickedFile::from_path("clip.webm").media_type, "video/webm");
        assert_eq!(PickedFile::from_path("noext").media_type, OCTET_STREAM);
    }

    #[test]
    fn test_intake_reads_size_and_registers_reference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; 2_621_440]).unwrap();

        let mut refs = ReferenceRegistry::new();
        let desc = intake(&PickedFile::from_path(&path), &mut refs).unwrap();

        assert_eq!(desc.kind, MessageKind::Image);
        assert_eq!(desc.name, "photo.png");
        assert_eq!(desc.size, "2.50 MB");

        let url = desc.url.unwrap();
        assert!(url.starts_with(REFERENCE_PREFIX));
        assert_eq!(refs.resolve(&url), Some(path.as_path()));
    }

    #[test]
    fn test_intake_missing_file_is_an_error() {
        let mut refs = ReferenceRegistry::new();
        let result = intake(&PickedFile::from_path("/definitely/not/here.pdf"), &mut refs);
        assert!(matches!(result, Err(ChatError::Attachment { .. })));
        assert!(refs.is_empty());
    }

    #[test]
    fn test_declared_type_wins_over_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recording.bin");
        fs::write(&path, b"data").unwrap();

        let mut refs = ReferenceRegistry::new();
        let desc = intake(&PickedFile::with_media_type(&path, "video/mp4"), &mut refs).unwrap();
        assert_eq!(desc.kind, MessageKind::Video);
    }

    #[test]
    fn test_release_all() {
        let mut refs = ReferenceRegistry::new();
        refs.acquire(Path::new("/tmp/a"));
        let url = refs.acquire(Path::new("/tmp/b"));
        assert_eq!(refs.release_all(), 2);
        assert!(refs.resolve(&url).is_none());
        assert_eq!(refs.release_all(), 0);
    }

    #[test]
    fn test_release_reference() {
        let mut refs = ReferenceRegistry::new();
        let url = refs.acquire(Path::new("/tmp/a"));
        assert_eq!(refs.len(), 1);
        assert!(refs.release(&url));
        assert!(!refs.release(&url));
        assert!(refs.resolve(&url).is_none());
    }
}
