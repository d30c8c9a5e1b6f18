use anyhow::Result;
use async_trait::async_trait;

use crate::types::InventoryRecord;

/// Trait for multimodal models that can look at an image and answer a prompt.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model used when a request does not name one.
    fn default_model(&self) -> &str;

    /// Send the image and prompt, returning the model's raw text.
    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse>;
}

/// Request to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: String,
    pub prompt: String,
    pub image: Vec<u8>,
    pub mime_type: String,
}

/// Response from a vision provider.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Read-only key to record lookup backing the stock check.
///
/// Implementations must match names case-insensitively and return
/// [`InventoryRecord::UNKNOWN`] for names they do not hold.
pub trait InventorySource: Send + Sync {
    fn lookup(&self, item: &str) -> InventoryRecord;

    /// All known entries, sorted by name.
    fn entries(&self) -> Vec<(String, InventoryRecord)>;
}
