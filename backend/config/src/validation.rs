//! Config validation: field checks with user-friendly error messages.

use crate::schema::AuditorConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &AuditorConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_provider(config, &mut report);
    validate_server(config, &mut report);
    validate_logging(config, &mut report);
    report
}

/// The credential must be present before anything is served.
fn validate_provider(config: &AuditorConfig, report: &mut ValidationReport) {
    let provider = &config.provider;

    if provider.kind.requires_credential() && provider.credential().is_none() {
        report.error(
            "provider.apiKey",
            format!(
                "No API key for provider '{}'; set {}",
                provider.kind,
                provider.kind.api_key_vars().join(" or ")
            ),
        );
    }

    if let Some(model) = &provider.model {
        if model.trim().is_empty() {
            report.error("provider.model", "Model cannot be empty when set");
        }
    }

    if let Some(url) = &provider.base_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            report.error("provider.baseUrl", format!("Base URL must be http(s): {url}"));
        }
    }

    if !provider.kind.requires_credential() {
        report.warn("provider.kind", "Mock provider in use; images are not analyzed");
    } else if provider.mock_response.is_some() {
        report.warn("provider.mockResponse", "Ignored unless provider.kind is mock");
    }
}

fn validate_server(config: &AuditorConfig, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if config.server.bind.trim().is_empty() {
        report.error("server.bind", "Bind address cannot be empty");
    }
    if config.server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Upload limit must be positive");
    }
}

fn validate_logging(config: &AuditorConfig, report: &mut ValidationReport) {
    if config.logging.level.trim().is_empty() {
        report.warn("logging.level", "Empty log level; defaulting to info");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProviderConfig, ProviderKind};

    fn with_provider(provider: ProviderConfig) -> AuditorConfig {
        AuditorConfig {
            provider,
            ..Default::default()
        }
    }

    #[test]
    fn missing_credential_is_an_error() {
        let report = validate(&AuditorConfig::default());
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "provider.apiKey");
        assert!(report.errors[0].message.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn keyed_provider_is_valid() {
        let report = validate(&with_provider(ProviderConfig {
            api_key: Some("abc".into()),
            ..Default::default()
        }));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn mock_needs_no_key_but_warns() {
        let report = validate(&with_provider(ProviderConfig {
            kind: ProviderKind::Mock,
            ..Default::default()
        }));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn bad_base_url_and_port() {
        let mut config = with_provider(ProviderConfig {
            kind: ProviderKind::OpenAi,
            api_key: Some("sk".into()),
            base_url: Some("ftp://proxy".into()),
            ..Default::default()
        });
        config.server.port = 0;
        let paths: Vec<_> = validate(&config).errors.into_iter().map(|e| e.path).collect();
        assert_eq!(paths, ["provider.baseUrl", "server.port"]);
    }
}
