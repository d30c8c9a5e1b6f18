//! MIME type detection for uploaded images.
//!
//! Extension lookup decides what the client claims; magic bytes decide what
//! the payload actually is.

use std::path::Path;

pub const JPEG: &str = "image/jpeg";
pub const PNG: &str = "image/png";

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Detect MIME type by file extension. Anything but JPEG/PNG is opaque.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => JPEG,
        "png" => PNG,
        _ => "application/octet-stream",
    }
}

/// Identify an image from its leading bytes. Only JPEG and PNG are known.
pub fn sniff_image(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(JPEG_MAGIC) {
        Some(JPEG)
    } else if data.starts_with(PNG_MAGIC) {
        Some(PNG)
    } else {
        None
    }
}

/// Whether the auditor accepts this MIME type.
pub fn is_supported_image(mime: &str) -> bool {
    matches!(mime, JPEG | PNG)
}
