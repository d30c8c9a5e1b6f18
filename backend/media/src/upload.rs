use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::mime_detect::{detect_mime_type, is_supported_image, sniff_image};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("empty upload")]
    Empty,

    #[error("unsupported file type '{filename}' (expected .jpg, .jpeg or .png)")]
    UnsupportedType { filename: String },

    #[error("'{filename}' is named as {declared} but its contents are not")]
    ContentMismatch { filename: String, declared: &'static str },

    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

/// An image accepted for auditing.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: &'static str,
    pub data: Bytes,
}

impl ImageUpload {
    /// Accept `data` if `filename` has a JPEG/PNG extension and the bytes agree.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Result<Self, MediaError> {
        let filename = filename.into();
        let data = data.into();

        if data.is_empty() {
            return Err(MediaError::Empty);
        }

        let declared = detect_mime_type(Path::new(&filename));
        if !is_supported_image(declared) {
            return Err(MediaError::UnsupportedType { filename });
        }

        if sniff_image(&data) != Some(declared) {
            return Err(MediaError::ContentMismatch { filename, declared });
        }

        debug!(filename = %filename, mime = declared, bytes = data.len(), "Accepted image upload");
        Ok(Self {
            filename,
            mime_type: declared,
            data,
        })
    }

    /// Like [`ImageUpload::new`], rejecting payloads above `limit` bytes first.
    pub fn with_limit(
        filename: impl Into<String>,
        data: impl Into<Bytes>,
        limit: usize,
    ) -> Result<Self, MediaError> {
        let data = data.into();
        if data.len() > limit {
            return Err(MediaError::TooLarge {
                size: data.len(),
                limit,
            });
        }
        Self::new(filename, data)
    }

    /// Read an image from disk, applying the same checks as an upload.
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(filename, data)?)
    }
}
