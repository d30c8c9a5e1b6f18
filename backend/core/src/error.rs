use thiserror::Error;

/// Failure to turn a model's free-text reply into an [`AuditResult`](crate::AuditResult).
///
/// Each variant carries the offending text so it can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("no JSON object found in model response")]
    NoJsonFound { raw: String },

    #[error("model response JSON could not be decoded: {reason}")]
    MalformedJson { span: String, reason: String },

    #[error("model response JSON is missing field `{field}`")]
    MissingField { field: String, span: String },
}

impl AuditError {
    /// Stable identifier used in API payloads and log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoJsonFound { .. } => "NoJsonFound",
            Self::MalformedJson { .. } => "MalformedJson",
            Self::MissingField { .. } => "MissingField",
        }
    }

    /// The text that failed: the whole reply, or the captured span.
    pub fn raw(&self) -> &str {
        match self {
            Self::NoJsonFound { raw } => raw,
            Self::MalformedJson { span, .. } | Self::MissingField { span, .. } => span,
        }
    }
}

/// Top-level error type for an audit run.
#[derive(Debug, Error)]
pub enum AuditorError {
    #[error("vision provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error(transparent)]
    Extraction(#[from] AuditError),

    #[error("unsupported upload: {0}")]
    Media(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_raw_follow_variant() {
        let err = AuditError::MalformedJson {
            span: "{item: laptop}".into(),
            reason: "key must be a string".into(),
        };
        assert_eq!(err.kind(), "MalformedJson");
        assert_eq!(err.raw(), "{item: laptop}");

        let err = AuditError::NoJsonFound { raw: "I see a laptop".into() };
        assert_eq!(err.kind(), "NoJsonFound");
        assert_eq!(err.raw(), "I see a laptop");
    }

    #[test]
    fn extraction_error_converts_transparently() {
        let err: AuditorError = AuditError::MissingField {
            field: "item".into(),
            span: "{}".into(),
        }
        .into();
        assert_eq!(err.to_string(), "model response JSON is missing field `item`");
    }
}
