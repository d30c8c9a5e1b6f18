//! Structured logging for stockaudit.
//!
//! Handles subscriber setup (console, optional JSON, optional rolling file),
//! secret redaction, and the audit event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AuditEvent, AuditEventEntry, EventLogger};
pub use logger::{init_logger, LogSettings};
pub use redact::redact_sensitive_data;
