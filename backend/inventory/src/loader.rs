//! Load a stock table from a YAML or JSON file.
//!
//! The file is a map from item name to record:
//!
//! ```yaml
//! laptop: { stockLevel: High, count: 22 }
//! bottle: { stock: Low, count: 3 }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use stockaudit_core::InventoryRecord;
use tracing::info;

use crate::table::StaticInventory;

/// Parse a table from text. JSON is tried when the path says so, YAML otherwise.
pub fn parse_table(content: &str, is_json: bool) -> Result<StaticInventory> {
    let records: BTreeMap<String, InventoryRecord> = if is_json {
        serde_json::from_str(content).context("Failed to parse inventory JSON")?
    } else {
        serde_yaml::from_str(content).context("Failed to parse inventory YAML")?
    };

    if let Some(blank) = records.keys().find(|name| name.trim().is_empty()) {
        bail!("inventory contains a blank item name: {blank:?}");
    }

    let lowered: BTreeSet<String> = records.keys().map(|k| k.to_lowercase()).collect();
    if lowered.len() != records.len() {
        bail!("inventory contains item names that differ only by case");
    }

    Ok(StaticInventory::new(records))
}

/// Read and parse an inventory file.
pub async fn load_inventory(path: &Path) -> Result<StaticInventory> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read inventory file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let inventory = parse_table(&content, is_json)?;
    info!(path = %path.display(), items = inventory.len(), "Loaded inventory table");
    Ok(inventory)
}
