//! Stock tables for the audit lookup step.
//!
//! Lookups never fail: unknown names resolve to `InventoryRecord::UNKNOWN`.

pub mod loader;
pub mod table;

pub use loader::{load_inventory, parse_table};
pub use table::StaticInventory;
