//! Browser upload page.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use tracing::warn;

use stockaudit_core::{AuditError, AuditorError};

use crate::attachments::read_image;
use crate::render;
use crate::server::GatewayState;

/// Handler for `GET /`
pub async fn index() -> Html<String> {
    Html(render::page(""))
}

/// Handler for `POST /audit`: the page again, with a result or error card.
pub async fn audit_form(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let upload = match read_image(multipart, state.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(e) => {
            let card = render::error_card("Upload rejected", &e.to_string(), None);
            return (e.status(), Html(render::page(&card)));
        }
    };

    match state.auditor.audit(&upload.data, upload.mime_type).await {
        Ok(report) => {
            let card = render::report_card(&report, &upload);
            (StatusCode::OK, Html(render::page(&card)))
        }
        Err(AuditorError::Extraction(e)) => {
            let card = render::error_card(extraction_title(&e), &e.to_string(), Some(e.raw()));
            (StatusCode::UNPROCESSABLE_ENTITY, Html(render::page(&card)))
        }
        Err(e @ AuditorError::Provider { .. }) => {
            let card = render::error_card("Vision model unavailable", &e.to_string(), None);
            (StatusCode::BAD_GATEWAY, Html(render::page(&card)))
        }
        Err(e @ AuditorError::Media(_)) => {
            warn!(error = %e, "Audit rejected the image");
            let card = render::error_card("Upload rejected", &e.to_string(), None);
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, Html(render::page(&card)))
        }
    }
}

fn extraction_title(e: &AuditError) -> &'static str {
    match e {
        AuditError::NoJsonFound { .. } => "❌ No JSON found in model response",
        AuditError::MalformedJson { .. } => "❌ JSON parse failed",
        AuditError::MissingField { .. } => "❌ Model response has no item",
    }
}
