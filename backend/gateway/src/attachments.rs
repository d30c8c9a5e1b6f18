//! Image uploads from multipart forms.
//!
//! Both the HTML form and the JSON API take the picture in an `image` field.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use thiserror::Error;
use tracing::info;

use stockaudit_media::{ImageUpload, MediaError};

/// Form field carrying the picture.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("no 'image' field in the upload")]
    MissingImage,

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::Multipart(e) => e.status(),
            UploadError::MissingImage => StatusCode::BAD_REQUEST,
            UploadError::Media(MediaError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Media(MediaError::UnsupportedType { .. })
            | UploadError::Media(MediaError::ContentMismatch { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            UploadError::Media(MediaError::Empty) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Pull the `image` field out of a multipart body and check it.
///
/// Other fields are skipped. A part without a file name is named after its
/// content type so the extension filter still applies.
pub async fn read_image(mut multipart: Multipart, limit: usize) -> Result<ImageUpload, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback_name(field.content_type()),
        };
        let data = field.bytes().await?;
        info!(filename = %filename, bytes = data.len(), "Received image upload");

        return Ok(ImageUpload::with_limit(filename, data, limit)?);
    }
    Err(UploadError::MissingImage)
}

fn fallback_name(content_type: Option<&str>) -> String {
    match content_type {
        Some("image/jpeg") => "upload.jpg".into(),
        Some("image/png") => "upload.png".into(),
        _ => "upload".into(),
    }
}
