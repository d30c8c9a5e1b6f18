//! Main HTTP gateway server and routing.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use stockaudit_core::InventorySource;
use stockaudit_understanding::Auditor;

use crate::{audit_api, control_ui, health_api};

/// Multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub auditor: Arc<Auditor>,
    pub inventory: Arc<dyn InventorySource>,
    pub max_upload_bytes: usize,
}

impl GatewayState {
    pub fn new(auditor: Auditor, max_upload_bytes: usize) -> Self {
        let inventory = auditor.inventory().clone();
        Self {
            auditor: Arc::new(auditor),
            inventory,
            max_upload_bytes,
        }
    }
}

/// Build the gateway router: the HTML page plus the JSON API.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // Control UI
        .route("/", get(control_ui::index))
        .route("/audit", post(control_ui::audit_form))
        // API Endpoints
        .route("/api/audit", post(audit_api::audit))
        .route("/api/inventory", get(audit_api::list_inventory))
        .route("/api/inventory/:item", get(audit_api::lookup_item))
        .route("/api/health", get(health_api::get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the gateway HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
