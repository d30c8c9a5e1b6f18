use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The item a vision model identified, decoded from its JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub item: String,
    /// Free-text justification (`confidence`) or category the model gave.
    pub reasoning: String,
}

/// Categorical stock status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl StockLevel {
    /// Badge label, e.g. "Low Stock".
    pub fn label(&self) -> String {
        format!("{self} Stock")
    }

    /// CSS color for the stock badge.
    pub fn badge_color(&self) -> &'static str {
        match self {
            Self::Low => "#ff4b4b",
            Self::Medium => "#ffa500",
            Self::High => "#00ff9c",
            Self::Unknown => "#cccccc",
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Stock record for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(alias = "stock")]
    pub stock_level: StockLevel,
    pub count: u32,
}

impl InventoryRecord {
    pub const UNKNOWN: Self = Self {
        stock_level: StockLevel::Unknown,
        count: 0,
    };

    pub fn new(stock_level: StockLevel, count: u32) -> Self {
        Self { stock_level, count }
    }
}

/// Which fixed instruction is sent alongside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Ask for `{"item", "confidence"}` with a short reasoning.
    #[default]
    Reasoning,
    /// Ask for `{"item", "category"}` under strict JSON-only rules.
    Category,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reasoning" | "confidence" => Ok(Self::Reasoning),
            "category" => Ok(Self::Category),
            other => Err(format!("unknown prompt style '{other}'")),
        }
    }
}

/// Outcome of a successful audit: what was seen and what the shelf says.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub audit_id: Uuid,
    pub item: String,
    pub reasoning: String,
    pub inventory: InventoryRecord,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_record_uses_camel_case() {
        let json = serde_json::to_value(InventoryRecord::new(StockLevel::High, 22)).unwrap();
        assert_eq!(json, serde_json::json!({"stockLevel": "High", "count": 22}));
    }

    #[test]
    fn stock_badges() {
        assert_eq!(StockLevel::Low.label(), "Low Stock");
        assert_eq!(StockLevel::Unknown.badge_color(), "#cccccc");
    }

    #[test]
    fn prompt_style_parses() {
        assert_eq!("Category".parse::<PromptStyle>(), Ok(PromptStyle::Category));
        assert_eq!("confidence".parse::<PromptStyle>(), Ok(PromptStyle::Reasoning));
        assert!("poem".parse::<PromptStyle>().is_err());
    }
}
