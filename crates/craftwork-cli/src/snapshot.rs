//! Inventory snapshot files.
//!
//! A snapshot is a TOML file holding a dense list of items, an optional
//! capacity and optional vitals. Snapshots with vitals craft through the
//! player path; the rest craft as plain containers.

use std::fs;
use std::path::Path;

use craftwork_common::{CraftworkError, CraftworkResult, SchemaVersion};
use craftwork_core::{Inventory, InventoryResult, InventoryView, Item, Vitals};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serialized inventory contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Slot count (None = configured default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    /// Cost-paying stats of the owner, if it is a player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,
    /// Items in slot order.
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_version() -> String {
    SchemaVersion::INVENTORY_SNAPSHOT.to_string()
}

impl InventorySnapshot {
    /// Captures an inventory's occupied slots.
    #[must_use]
    pub fn capture(inventory: &Inventory, vitals: Option<Vitals>) -> Self {
        Self {
            version: default_version(),
            capacity: Some(inventory.capacity()),
            vitals,
            items: inventory.iter().cloned().collect(),
        }
    }

    /// Parses a snapshot and checks its version.
    pub fn parse(content: &str) -> CraftworkResult<Self> {
        let snapshot: Self =
            toml::from_str(content).map_err(|e| CraftworkError::Serialization(e.to_string()))?;
        SchemaVersion::INVENTORY_SNAPSHOT.check_readable(&snapshot.version)?;
        Ok(snapshot)
    }

    /// Loads a snapshot from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> CraftworkResult<Self> {
        let path = path.as_ref();
        debug!("Loading inventory snapshot: {}", path.display());
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Saves the snapshot to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> CraftworkResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CraftworkError::Serialization(e.to_string()))?;
        fs::write(path, contents)?;

        debug!("Saved inventory snapshot to {}", path.display());
        Ok(())
    }

    /// Builds an inventory holding the snapshot's items, one slot each.
    pub fn to_inventory(&self, default_capacity: usize, stack_limit: u32) -> InventoryResult<Inventory> {
        let capacity = self.capacity.unwrap_or(default_capacity);
        Inventory::with_stack_limit(capacity, stack_limit).with_items(self.items.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftwork_core::{InventoryError, ItemClass};
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"
version = "1.0.0"
capacity = 8

[vitals]
stamina = 10

[vitals.wallet]
gold = 25

[[items]]
name = "Stone"
category = "Resource"
class = "resource"
stack = 4

[[items]]
name = "Stone"
category = "Resource"
class = "resource"
"#;

    fn stone(stack: u32) -> Item {
        Item::new("Stone", "Resource", ItemClass::Resource).with_stack(stack)
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = InventorySnapshot::parse(SNAPSHOT).expect("parse");
        assert_eq!(snapshot.capacity, Some(8));
        assert_eq!(snapshot.items, vec![stone(4), stone(1)]);

        let vitals = snapshot.vitals.expect("vitals");
        assert_eq!(vitals.stamina, 10);
        assert_eq!(vitals.health, 0);
        assert_eq!(vitals.wallet.balance(), 25);
    }

    #[test]
    fn test_to_inventory_keeps_duplicate_stacks() {
        let snapshot = InventorySnapshot::parse(SNAPSHOT).expect("parse");
        let inventory = snapshot.to_inventory(36, 999).expect("fits");

        assert_eq!(inventory.capacity(), 8);
        assert_eq!(inventory.item_count(), 2);
        assert_eq!(inventory.count(&stone(1)), 5);
    }

    #[test]
    fn test_to_inventory_over_capacity() {
        let snapshot = InventorySnapshot {
            version: default_version(),
            capacity: Some(1),
            vitals: None,
            items: vec![stone(1), stone(2)],
        };
        assert!(matches!(
            snapshot.to_inventory(36, 999),
            Err(InventoryError::Full { capacity: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let content = SNAPSHOT.replace("1.0.0", "3.0.0");
        assert!(matches!(
            InventorySnapshot::parse(&content),
            Err(CraftworkError::VersionMismatch { .. })
        ));
        assert!(matches!(
            InventorySnapshot::parse("items = 3"),
            Err(CraftworkError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("bag.toml");

        let inventory = Inventory::from_slots(4, [stone(3)]).expect("fits");
        let snapshot = InventorySnapshot::capture(&inventory, Some(Vitals::new(5, 5, 5, 5)));
        snapshot.save_to(&path).expect("save");

        let loaded = InventorySnapshot::load(&path).expect("load");
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            InventorySnapshot::load("/nonexistent/bag.toml"),
            Err(CraftworkError::Io(_))
        ));
    }
}
