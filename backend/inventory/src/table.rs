use std::collections::HashMap;

use stockaudit_core::{InventoryRecord, InventorySource, StockLevel};

/// In-memory stock table, fixed at construction.
///
/// Keys are lowercased once up front so lookups are a single hash probe.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    records: HashMap<String, InventoryRecord>,
}

impl StaticInventory {
    pub fn new<I, K>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, InventoryRecord)>,
        K: AsRef<str>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(name, record)| (name.as_ref().to_lowercase(), record))
                .collect(),
        }
    }

    /// The demo shelf: a handful of office items.
    pub fn demo() -> Self {
        Self::new([
            ("bottle", InventoryRecord::new(StockLevel::Low, 3)),
            ("laptop", InventoryRecord::new(StockLevel::High, 22)),
            ("phone", InventoryRecord::new(StockLevel::Medium, 11)),
            ("mouse", InventoryRecord::new(StockLevel::High, 40)),
            ("keyboard", InventoryRecord::new(StockLevel::Low, 4)),
        ])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl InventorySource for StaticInventory {
    fn lookup(&self, item: &str) -> InventoryRecord {
        self.records
            .get(&item.to_lowercase())
            .copied()
            .unwrap_or(InventoryRecord::UNKNOWN)
    }

    fn entries(&self) -> Vec<(String, InventoryRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(name, record)| (name.clone(), *record))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let inventory = StaticInventory::demo();
        assert_eq!(inventory.lookup("LAPTOP"), inventory.lookup("laptop"));
        assert_eq!(inventory.lookup("Laptop"), InventoryRecord::new(StockLevel::High, 22));
    }

    #[test]
    fn unknown_item_is_sentinel() {
        let inventory = StaticInventory::demo();
        assert_eq!(
            inventory.lookup("spaceship"),
            InventoryRecord { stock_level: StockLevel::Unknown, count: 0 }
        );
    }

    #[test]
    fn no_partial_matches() {
        let inventory = StaticInventory::demo();
        assert_eq!(inventory.lookup("lap"), InventoryRecord::UNKNOWN);
        assert_eq!(inventory.lookup("laptops"), InventoryRecord::UNKNOWN);
        assert_eq!(inventory.lookup(" laptop"), InventoryRecord::UNKNOWN);
    }

    #[test]
    fn repeated_lookups_are_identical() {
        let inventory = StaticInventory::demo();
        let first = serde_json::to_vec(&inventory.lookup("mouse")).unwrap();
        for _ in 0..10 {
            assert_eq!(serde_json::to_vec(&inventory.lookup("mouse")).unwrap(), first);
        }
    }

    #[test]
    fn mixed_case_keys_are_normalized() {
        let inventory = StaticInventory::new([("Monitor", InventoryRecord::new(StockLevel::Medium, 8))]);
        assert_eq!(inventory.lookup("monitor").count, 8);
        assert_eq!(inventory.entries()[0].0, "monitor");
    }

    #[test]
    fn entries_are_sorted() {
        let names: Vec<_> = StaticInventory::demo()
            .entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["bottle", "keyboard", "laptop", "mouse", "phone"]);
    }
}
