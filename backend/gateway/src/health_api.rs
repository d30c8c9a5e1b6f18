//! Gateway Health API

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub provider: String,
    pub model: String,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        service: "stockaudit".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: state.auditor.provider_name().to_string(),
        model: state.auditor.model().to_string(),
    })
}
