//! Stockaudit Gateway HTTP Server
//!
//! Serves the upload page and the JSON audit and inventory API.

pub mod attachments;
pub mod audit_api;
pub mod control_ui;
pub mod health_api;
pub mod render;
pub mod server;

pub use server::{build_router, start_server, GatewayState};
