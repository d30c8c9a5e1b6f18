//! Config redaction: produce safe-to-share config snapshots by masking secrets.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::AuditorConfig;

/// Keys whose string values are always masked.
static SECRET_KEYS: &[&str] = &["apiKey", "api_key", "apikey", "token", "secret", "password"];

/// Key-shaped strings masked wherever they appear.
static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(AIza[0-9A-Za-z_\-]{35}|sk-[A-Za-z0-9_\-]{20,})$").unwrap());

/// Redact a config JSON value, replacing sensitive fields with a short hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

/// Serialize and redact a config for display.
pub fn redacted_snapshot(config: &AuditorConfig) -> Value {
    serde_json::to_value(config)
        .map(|v| redact(&v))
        .unwrap_or(Value::Null)
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if s.is_empty() || !(is_sensitive_key(key) || KEY_PATTERN.is_match(s)) {
        return Value::String(s.to_string());
    }
    // First 4 chars as a hint, when the secret is long enough to spare them.
    let hint = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_api_key_field() {
        let mut config = AuditorConfig::default();
        config.provider.api_key = Some("super-secret-value".into());
        let snapshot = redacted_snapshot(&config);
        assert_eq!(snapshot["provider"]["apiKey"], "supe***");
        assert_eq!(snapshot["server"]["port"], 8501);
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let v = redact(&json!({"token": "abc"}));
        assert_eq!(v["token"], "***");
    }

    #[test]
    fn key_shaped_values_masked_anywhere() {
        let v = redact(&json!({"note": "sk-abcdefghijklmnopqrstuvwxyz"}));
        assert_eq!(v["note"], "sk-a***");
    }

    #[test]
    fn ordinary_values_untouched() {
        let v = redact(&json!({"model": "gemini-2.5-flash", "apiKey": null}));
        assert_eq!(v, json!({"model": "gemini-2.5-flash", "apiKey": null}));
    }
}
