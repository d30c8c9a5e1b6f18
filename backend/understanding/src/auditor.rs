use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use stockaudit_core::{
    AuditReport, AuditorError, InventorySource, PromptStyle, VisionProvider, VisionRequest,
};
use stockaudit_logging::{AuditEvent, EventLogger};

use crate::extract::extract_audit_result;
use crate::prompt;

/// Runs one image through the vision model, the extractor, and the stock lookup.
pub struct Auditor {
    provider: Arc<dyn VisionProvider>,
    inventory: Arc<dyn InventorySource>,
    model: String,
    prompt: PromptStyle,
}

impl Auditor {
    pub fn new(provider: Arc<dyn VisionProvider>, inventory: Arc<dyn InventorySource>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            inventory,
            model,
            prompt: PromptStyle::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: PromptStyle) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inventory(&self) -> &Arc<dyn InventorySource> {
        &self.inventory
    }

    /// Identify the item in `image` and report its stock.
    ///
    /// No retry: a provider failure or an unusable reply ends the audit.
    #[instrument(skip(self, image), fields(provider = %self.provider.name(), bytes = image.len()))]
    pub async fn audit(&self, image: &[u8], mime_type: &str) -> Result<AuditReport, AuditorError> {
        let audit_id = Uuid::new_v4();

        let request = VisionRequest {
            model: self.model.clone(),
            prompt: prompt::instruction(self.prompt).to_string(),
            image: image.to_vec(),
            mime_type: mime_type.to_string(),
        };

        let response = match self.provider.describe(&request).await {
            Ok(response) => response,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(audit_id = %audit_id, error = %message, "Vision provider failed");
                EventLogger::log_event(
                    audit_id,
                    AuditEvent::ProviderFailed {
                        provider: self.provider.name().to_string(),
                        error_msg: message.clone(),
                    },
                );
                return Err(AuditorError::Provider {
                    provider: self.provider.name().to_string(),
                    message,
                });
            }
        };

        let result = extract_audit_result(&response.content).inspect_err(|e| {
            EventLogger::log_event(
                audit_id,
                AuditEvent::ExtractionFailed {
                    kind: e.kind().to_string(),
                    raw: e.raw().to_string(),
                },
            );
        })?;

        let inventory = self.inventory.lookup(&result.item);

        info!(
            audit_id = %audit_id,
            item = %result.item,
            stock = %inventory.stock_level,
            latency_ms = response.latency_ms,
            "Item identified"
        );
        EventLogger::log_event(
            audit_id,
            AuditEvent::Identified {
                item: result.item.clone(),
                stock_level: inventory.stock_level.to_string(),
                count: inventory.count,
            },
        );

        Ok(AuditReport {
            audit_id,
            item: result.item,
            reasoning: result.reasoning,
            inventory,
            provider: response.provider,
            model: response.model,
            latency_ms: response.latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use stockaudit_core::{AuditError, InventoryRecord, StockLevel, VisionResponse};
    use stockaudit_inventory::StaticInventory;

    use crate::providers::MockProvider;

    fn auditor(reply: &str) -> Auditor {
        Auditor::new(
            Arc::new(MockProvider::new("mock").with_response(reply)),
            Arc::new(StaticInventory::demo()),
        )
    }

    struct FailingProvider;

    #[async_trait]
    impl VisionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }
        fn default_model(&self) -> &str {
            "none"
        }
        async fn describe(&self, _request: &VisionRequest) -> Result<VisionResponse> {
            anyhow::bail!("upstream unavailable")
        }
    }

    #[tokio::test]
    async fn identified_item_gets_stock_record() {
        let report = auditor(r#"Here you go: {"item": "Laptop", "confidence": "visible hinge"}"#)
            .audit(b"fake", "image/png")
            .await
            .unwrap();
        assert_eq!(report.item, "Laptop");
        assert_eq!(report.reasoning, "visible hinge");
        assert_eq!(report.inventory, InventoryRecord::new(StockLevel::High, 22));
        assert_eq!(report.provider, "mock");
        assert_eq!(report.model, "mock");
    }

    #[tokio::test]
    async fn unknown_item_gets_sentinel() {
        let report = auditor(r#"{"item": "spaceship", "confidence": "fins"}"#)
            .audit(b"fake", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(report.inventory, InventoryRecord::UNKNOWN);
    }

    #[tokio::test]
    async fn extraction_failure_surfaces_raw_text() {
        let err = auditor("I cannot tell what this is.")
            .audit(b"fake", "image/jpeg")
            .await
            .unwrap_err();
        match err {
            AuditorError::Extraction(AuditError::NoJsonFound { raw }) => {
                assert_eq!(raw, "I cannot tell what this is.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let auditor = Auditor::new(Arc::new(FailingProvider), Arc::new(StaticInventory::demo()));
        let err = auditor.audit(b"fake", "image/png").await.unwrap_err();
        match err {
            AuditorError::Provider { provider, message } => {
                assert_eq!(provider, "failing");
                assert!(message.contains("upstream unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_override_reaches_provider() {
        let auditor = auditor(r#"{"item": "mouse"}"#)
            .with_model("gemini-2.0-flash")
            .with_prompt(PromptStyle::Category);
        let report = auditor.audit(b"fake", "image/png").await.unwrap();
        assert_eq!(report.model, "gemini-2.0-flash");
    }
}
