//! Wires config into a ready-to-run auditor.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use stockaudit_config::{AuditorConfig, ProviderConfig, ProviderKind, ValidationReport};
use stockaudit_core::{AuditorError, InventorySource, VisionProvider};
use stockaudit_inventory::{load_inventory, StaticInventory};
use stockaudit_media::ImageUpload;
use stockaudit_understanding::{Auditor, GeminiProvider, MockProvider, OpenAiProvider};

/// Load and validate config. Any validation error is fatal.
pub async fn load_config(path: &Path) -> Result<AuditorConfig> {
    let (config, report) = stockaudit_config::load_and_prepare(path).await?;
    ensure_valid(&report)?;
    Ok(config)
}

pub fn ensure_valid(report: &ValidationReport) -> Result<()> {
    if let Some(first) = report.errors.first() {
        bail!(
            "invalid configuration ({} error(s)); first: {}",
            report.errors.len(),
            first
        );
    }
    Ok(())
}

/// Construct the configured vision provider.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn VisionProvider>> {
    let provider: Arc<dyn VisionProvider> = match config.kind {
        ProviderKind::Gemini => {
            let key = require_key(config)?;
            let mut provider = GeminiProvider::new(key);
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            Arc::new(provider)
        }
        ProviderKind::OpenAi => {
            let key = require_key(config)?;
            let mut provider = OpenAiProvider::new(key);
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model);
            }
            Arc::new(provider)
        }
        ProviderKind::Mock => {
            let mut provider = MockProvider::new("mock");
            if let Some(reply) = &config.mock_response {
                provider = provider.with_response(reply);
            }
            Arc::new(provider)
        }
    };
    info!(provider = provider.name(), model = provider.default_model(), "Vision provider ready");
    Ok(provider)
}

fn require_key(config: &ProviderConfig) -> Result<&str> {
    config.credential().with_context(|| {
        format!(
            "no API key for provider '{}'; set {}",
            config.kind,
            config.kind.api_key_vars().join(" or ")
        )
    })
}

/// The configured inventory file, or the built-in demo table.
pub async fn build_inventory(config: &AuditorConfig) -> Result<Arc<dyn InventorySource>> {
    let inventory = match &config.inventory.path {
        Some(path) => load_inventory(path).await?,
        None => StaticInventory::demo(),
    };
    info!(items = inventory.len(), "Inventory loaded");
    Ok(Arc::new(inventory))
}

pub async fn build_auditor(config: &AuditorConfig) -> Result<Auditor> {
    let provider = build_provider(&config.provider)?;
    let inventory = build_inventory(config).await?;
    Ok(Auditor::new(provider, inventory).with_prompt(config.prompt))
}

/// Read an image file for a one-off audit. Any rejection is a media error.
pub async fn load_image(path: &Path) -> Result<ImageUpload, AuditorError> {
    ImageUpload::from_path(path)
        .await
        .map_err(|e| AuditorError::Media(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_variables() {
        let err = build_provider(&ProviderConfig::default()).err().unwrap();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn configured_model_reaches_the_provider() {
        let provider = build_provider(&ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: Some("sk-test".into()),
            model: Some("gpt-4o-mini".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn mock_auditor_uses_demo_inventory() {
        let config = AuditorConfig {
            provider: ProviderConfig {
                kind: ProviderKind::Mock,
                ..Default::default()
            },
            ..Default::default()
        };
        let auditor = build_auditor(&config).await.unwrap();
        assert_eq!(auditor.provider_name(), "mock");
        assert_eq!(auditor.inventory().lookup("Laptop").count, 22);
    }

    #[test]
    fn default_config_fails_validation_with_key_hint() {
        let report = stockaudit_config::validate(&AuditorConfig::default());
        let err = ensure_valid(&report).unwrap_err().to_string();
        assert!(err.starts_with("invalid configuration (1 error(s))"));
        assert!(err.contains("provider.apiKey"));
        assert!(err.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn clean_report_passes() {
        let config = AuditorConfig {
            provider: ProviderConfig {
                kind: ProviderKind::Mock,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = stockaudit_config::validate(&config);
        assert!(ensure_valid(&report).is_ok());
    }

    #[tokio::test]
    async fn unsupported_image_file_is_a_media_error() {
        let path = std::env::temp_dir()
            .join(format!("stockaudit-{}-shelf.gif", std::process::id()));
        std::fs::write(&path, b"GIF89a\x01\x00\x01\x00").unwrap();
        let result = load_image(&path).await;
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AuditorError::Media(_))));
    }

    #[tokio::test]
    async fn missing_image_file_is_a_media_error() {
        let path = std::env::temp_dir().join("stockaudit-no-such-image.png");
        match load_image(&path).await {
            Err(AuditorError::Media(msg)) => assert!(msg.contains("Failed to read")),
            other => panic!("expected media error, got {other:?}"),
        }
    }
}
