//! Image intake: extension filtering and content sniffing for uploads.

pub mod mime_detect;
pub mod upload;

pub use mime_detect::{detect_mime_type, is_supported_image, sniff_image};
pub use upload::{ImageUpload, MediaError};
