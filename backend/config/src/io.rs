//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the stockaudit config directory.
/// Priority: `STOCKAUDIT_CONFIG_DIR` env > `~/.stockaudit/` > `./.stockaudit`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STOCKAUDIT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".stockaudit"))
        .unwrap_or_else(|| PathBuf::from(".stockaudit"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// The config file to use: `STOCKAUDIT_CONFIG` if set, else the default location.
pub fn default_config_path() -> PathBuf {
    std::env::var("STOCKAUDIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_file_path(&config_dir()))
}

/// Load the config file as an untyped value tree, before env substitution.
///
/// Returns an empty object if the file doesn't exist (first run).
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    // An empty YAML document parses as null.
    Ok(if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_object() {
        let value = load_raw_config(Path::new("/definitely/not/here.yaml")).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn empty_file_is_empty_object() {
        let path = std::env::temp_dir().join(format!("stockaudit-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, "").await.unwrap();
        let value = load_raw_config(&path).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
        fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_yaml_names_the_file() {
        let path = std::env::temp_dir().join(format!("stockaudit-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, "server: [unclosed").await.unwrap();
        let err = load_raw_config(&path).await.unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
        fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn config_file_lives_in_dir() {
        assert_eq!(
            config_file_path(Path::new("/etc/stockaudit")),
            PathBuf::from("/etc/stockaudit/config.yaml")
        );
    }
}
