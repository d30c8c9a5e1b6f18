//! CLI Doctor Command
//!
//! Checks the config file, provider credential, and inventory table.

use std::path::Path;

use anyhow::Result;

use stockaudit_config::{redacted_snapshot, AuditorConfig, ValidationReport};

use crate::bootstrap;
use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Runs every check. Returns whether all of them passed.
pub async fn run(config_path: &Path) -> Result<bool> {
    println!("\n🔍 Running stockaudit doctor...\n");
    note_info(&format!("Config file: {}", config_path.display()));

    let (config, report) = match stockaudit_config::load_and_prepare(config_path).await {
        Ok(loaded) => loaded,
        Err(e) => {
            note_error(&format!("Config could not be loaded: {e:#}"));
            return Ok(false);
        }
    };

    let mut is_ok = check_validation(&report);
    is_ok &= check_provider(&config);
    is_ok &= check_inventory(&config).await;

    println!("\nEffective config:");
    println!("{}", serde_json::to_string_pretty(&redacted_snapshot(&config))?);

    println!();
    if is_ok {
        note_success("All checks passed! stockaudit is ready.");
    } else {
        note_error("Some checks failed! Please fix the errors above.");
    }

    Ok(is_ok)
}

fn check_validation(report: &ValidationReport) -> bool {
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if report.is_valid() {
        note_success("Config is valid");
    }
    report.is_valid()
}

fn check_provider(config: &AuditorConfig) -> bool {
    match bootstrap::build_provider(&config.provider) {
        Ok(provider) => {
            note_success(&format!(
                "Provider '{}' configured with model {}",
                provider.name(),
                provider.default_model()
            ));
            true
        }
        Err(e) => {
            note_error(&format!("Provider: {e:#}"));
            false
        }
    }
}

async fn check_inventory(config: &AuditorConfig) -> bool {
    match bootstrap::build_inventory(config).await {
        Ok(inventory) => {
            let source = match &config.inventory.path {
                Some(path) => path.display().to_string(),
                None => "built-in demo table".to_string(),
            };
            note_success(&format!(
                "Inventory has {} item(s) from {}",
                inventory.entries().len(),
                source
            ));
            true
        }
        Err(e) => {
            note_error(&format!("Inventory: {e:#}"));
            false
        }
    }
}
