//! `stockaudit-config`: runtime configuration for the auditor.
//!
//! Provides:
//! - Typed config schema with defaults for every section
//! - YAML loading from `~/.stockaudit/config.yaml` (or `STOCKAUDIT_CONFIG`)
//! - `${ENV_VAR}` substitution and `STOCKAUDIT_*` overrides
//! - Redaction for safe logging/display
//! - Validation, including the startup credential check

pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, default_config_path, load_raw_config};
pub use redact::{redact, redacted_snapshot};
pub use schema::{
    AuditorConfig, InventoryConfig, LoggingConfig, ProviderConfig, ProviderKind, ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, apply env substitution and overrides, and validate a config file.
///
/// Validation errors are logged but not returned; callers decide whether
/// they are fatal via [`ValidationReport::is_valid`].
pub async fn load_and_prepare(path: &Path) -> Result<(AuditorConfig, ValidationReport)> {
    load_and_prepare_with(path, &env::process_env()).await
}

/// [`load_and_prepare`] against an explicit environment map.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(AuditorConfig, ValidationReport)> {
    let raw = load_raw_config(path).await?;

    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: AuditorConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok((config, report))
}
