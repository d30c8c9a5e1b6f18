//! Audit Event Logger
//!
//! One structured event per audit outcome, emitted under the `audit_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AuditEvent {
    Identified {
        item: String,
        stock_level: String,
        count: u32,
    },
    ExtractionFailed {
        kind: String,
        raw: String,
    },
    ProviderFailed {
        provider: String,
        error_msg: String,
    },
}

impl AuditEvent {
    fn is_failure(&self) -> bool {
        !matches!(self, Self::Identified { .. })
    }

    fn redacted(mut self) -> Self {
        match &mut self {
            Self::Identified { .. } => {}
            Self::ExtractionFailed { raw, .. } => *raw = redact_sensitive_data(raw),
            Self::ProviderFailed { error_msg, .. } => *error_msg = redact_sensitive_data(error_msg),
        }
        self
    }
}

#[derive(Debug, Serialize)]
pub struct AuditEventEntry {
    pub audit_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Builds the redacted entry for an event without emitting it.
    pub fn entry(audit_id: Uuid, event: AuditEvent) -> AuditEventEntry {
        AuditEventEntry {
            audit_id,
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }

    /// Logs an audit outcome, scrubbing secrets from any free text first.
    pub fn log_event(audit_id: Uuid, event: AuditEvent) {
        let failed = event.is_failure();
        let entry = Self::entry(audit_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();

        if failed {
            warn!(target: "audit_events", audit_id = %entry.audit_id, event = %payload, "Audit failed");
        } else {
            info!(target: "audit_events", audit_id = %entry.audit_id, event = %payload, "Audit event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_redacts_provider_errors() {
        let entry = EventLogger::entry(
            Uuid::new_v4(),
            AuditEvent::ProviderFailed {
                provider: "openai".into(),
                error_msg: "401 for Bearer abc.def.ghi".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "ProviderFailed");
        assert!(!json["event"]["error_msg"].as_str().unwrap().contains("abc.def.ghi"));
    }

    #[test]
    fn identified_is_not_a_failure() {
        let event = AuditEvent::Identified {
            item: "laptop".into(),
            stock_level: "High".into(),
            count: 22,
        };
        assert!(!event.is_failure());
        EventLogger::log_event(Uuid::new_v4(), event);
    }
}
