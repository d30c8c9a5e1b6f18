//! CLI Status Command
//!
//! Asks a running gateway for its health report.

use anyhow::Result;

use crate::terminal_output::{note_error, note_success};

/// Returns whether the gateway answered.
pub async fn run(port: u16) -> Result<bool> {
    println!("stockaudit status: checking...");
    let client = reqwest::Client::new();
    match client
        .get(format!("http://localhost:{port}/api/health"))
        .send()
        .await
    {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("Gateway is up on port {port}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(true)
        }
        Err(_) => {
            note_error(&format!("stockaudit is not running on port {port}"));
            Ok(false)
        }
    }
}
