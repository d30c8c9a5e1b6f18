pub mod auditor;
pub mod extract;
pub mod prompt;
pub mod providers;

pub use auditor::Auditor;
pub use extract::extract_audit_result;
pub use providers::{GeminiProvider, MockProvider, OpenAiProvider};
