use anyhow::Result;
use async_trait::async_trait;
use stockaudit_core::{VisionProvider, VisionRequest, VisionResponse};

/// A vision provider that returns a canned reply without looking at the image.
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }
}

#[async_trait]
impl VisionProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> &str {
        "mock"
    }

    async fn describe(&self, request: &VisionRequest) -> Result<VisionResponse> {
        Ok(VisionResponse {
            content: self.fixed_response.clone().unwrap_or_else(|| {
                r#"{"item": "laptop", "confidence": "mock provider always sees a laptop"}"#
                    .to_string()
            }),
            provider: self.name.clone(),
            model: request.model.clone(),
            latency_ms: 0,
        })
    }
}
