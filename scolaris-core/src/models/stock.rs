//! School supplies inventory

use serde::{Deserialize, Serialize};

use crate::sync::{Entity, EntityId, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: EntityId,
    pub name: String,
    pub unit: String,
    pub quantity: u32,
    /// Reorder when quantity drops to this level or below
    pub reorder_threshold: u32,
}

impl Entity for StockItem {
    const NAME: &'static str = "StockItem";
    const FIELDS: &'static [&'static str] = &["name", "unit", "quantity", "reorder_threshold"];

    fn id(&self) -> EntityId {
        self.id
    }
}

impl StockItem {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_threshold
    }

    /// Patch adding `received` units
    pub fn restock(&self, received: u32) -> Patch<StockItem> {
        Patch::new().set("quantity", self.quantity.saturating_add(received))
    }

    /// Patch removing `taken` units, or `None` if not enough are held
    pub fn withdraw(&self, taken: u32) -> Option<Patch<StockItem>> {
        let left = self.quantity.checked_sub(taken)?;
        Some(Patch::new().set("quantity", left))
    }
}

/// Items at or below their reorder threshold, in list order
pub fn reorder_list(items: &[StockItem]) -> Vec<&StockItem> {
    items.iter().filter(|item| item.needs_reorder()).collect()
}
