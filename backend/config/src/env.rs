//! Environment handling for config values.
//!
//! Two layers:
//! - `${VAR_NAME}` substitution inside the config file, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${}` escapes to a
//!   literal `${}`.
//! - `STOCKAUDIT_*` and provider key variables that override file values.

use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::AuditorConfig;

/// `${NAME}`, with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. An unset or empty variable is an error.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &process_env())
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                if missing.is_none() {
                    missing = Some(MissingEnvVarError {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `STOCKAUDIT_*` overrides and the provider's API key variable.
pub fn apply_env_overrides(
    mut config: AuditorConfig,
    env: &HashMap<String, String>,
) -> Result<AuditorConfig> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get("STOCKAUDIT_BIND") {
        config.server.bind = bind.to_string();
    }
    if let Some(port) = get("STOCKAUDIT_PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| anyhow!("STOCKAUDIT_PORT is not a valid port: {port}"))?;
    }
    if let Some(kind) = get("STOCKAUDIT_PROVIDER") {
        config.provider.kind = kind.parse().map_err(|e: String| anyhow!(e))?;
    }
    if let Some(model) = get("STOCKAUDIT_MODEL") {
        config.provider.model = Some(model.to_string());
    }
    if let Some(style) = get("STOCKAUDIT_PROMPT") {
        config.prompt = style.parse().map_err(|e: String| anyhow!(e))?;
    }
    if let Some(path) = get("STOCKAUDIT_INVENTORY") {
        config.inventory.path = Some(PathBuf::from(path));
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level.to_string();
    }

    let key = config
        .provider
        .kind
        .api_key_vars()
        .iter()
        .find_map(|&var| get(var));
    if let Some(key) = key {
        config.provider.api_key = Some(key.to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProviderKind;
    use serde_json::json;
    use stockaudit_core::PromptStyle;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"provider": {"apiKey": "${GEMINI_API_KEY}"}});
        let result = resolve_env_vars_with(&v, &env(&[("GEMINI_API_KEY", "abc123")])).unwrap();
        assert_eq!(result["provider"]["apiKey"], "abc123");
    }

    #[test]
    fn error_on_missing_var_names_path() {
        let v = json!({"provider": {"apiKey": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("provider.apiKey"));
    }

    #[test]
    fn escaped_reference_stays_literal() {
        let v = json!({"note": "cost $${DOLLARS} today"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["note"], "cost ${DOLLARS} today");
    }

    #[test]
    fn substitutes_inside_arrays_and_text() {
        let v = json!({"list": ["http://${HOST}:8080"]});
        let result = resolve_env_vars_with(&v, &env(&[("HOST", "localhost")])).unwrap();
        assert_eq!(result["list"][0], "http://localhost:8080");
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let config = apply_env_overrides(
            AuditorConfig::default(),
            &env(&[
                ("STOCKAUDIT_PORT", "9100"),
                ("STOCKAUDIT_PROVIDER", "openai"),
                ("STOCKAUDIT_PROMPT", "category"),
                ("OPENAI_API_KEY", "sk-live"),
                ("GEMINI_API_KEY", "ignored-for-openai"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.prompt, PromptStyle::Category);
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-live"));
    }

    #[test]
    fn gemini_falls_back_to_google_key() {
        let config =
            apply_env_overrides(AuditorConfig::default(), &env(&[("GOOGLE_API_KEY", "g-key")]))
                .unwrap();
        assert_eq!(config.provider.credential(), Some("g-key"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = apply_env_overrides(AuditorConfig::default(), &env(&[("STOCKAUDIT_PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("STOCKAUDIT_PORT"));
    }
}
