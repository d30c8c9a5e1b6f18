//! JSON audit and inventory API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use stockaudit_core::{AuditReport, AuditorError, InventoryRecord};

use crate::attachments::{read_image, UploadError};
use crate::server::GatewayState;

/// API failure, rendered as `{"error": kind, "message": ..., "raw": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Upload(UploadError),
    Audit(AuditorError),
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::Upload(e)
    }
}

impl From<AuditorError> for ApiError {
    fn from(e: AuditorError) -> Self {
        ApiError::Audit(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Upload(e) => (
                e.status(),
                json!({ "error": "UploadRejected", "message": e.to_string() }),
            ),
            ApiError::Audit(AuditorError::Extraction(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": e.kind(), "message": e.to_string(), "raw": e.raw() }),
            ),
            ApiError::Audit(e @ AuditorError::Provider { .. }) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "ProviderFailed", "message": e.to_string() }),
            ),
            ApiError::Audit(e @ AuditorError::Media(_)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({ "error": "UploadRejected", "message": e.to_string() }),
            ),
        };
        if status.is_server_error() {
            warn!(status = %status, body = %body, "Audit API request failed");
        }
        (status, Json(body)).into_response()
    }
}

/// One row of the inventory table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub item: String,
    #[serde(flatten)]
    pub record: InventoryRecord,
}

/// Handler for `POST /api/audit`
pub async fn audit(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<AuditReport>, ApiError> {
    let upload = read_image(multipart, state.max_upload_bytes).await?;
    let report = state.auditor.audit(&upload.data, upload.mime_type).await?;
    Ok(Json(report))
}

/// Handler for `GET /api/inventory`
pub async fn list_inventory(State(state): State<GatewayState>) -> Json<Vec<InventoryEntry>> {
    let entries = state
        .inventory
        .entries()
        .into_iter()
        .map(|(item, record)| InventoryEntry { item, record })
        .collect();
    Json(entries)
}

/// Handler for `GET /api/inventory/:item`. Unknown items are not an error.
pub async fn lookup_item(
    State(state): State<GatewayState>,
    Path(item): Path<String>,
) -> Json<InventoryEntry> {
    let record = state.inventory.lookup(&item);
    Json(InventoryEntry { item, record })
}
