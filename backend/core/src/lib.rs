pub mod error;
pub mod traits;
pub mod types;

pub use error::{AuditError, AuditorError};
pub use traits::{InventorySource, VisionProvider, VisionRequest, VisionResponse};
pub use types::{AuditReport, AuditResult, InventoryRecord, PromptStyle, StockLevel};
