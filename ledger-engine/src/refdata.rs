//! Reference data for display-name denormalization
//!
//! The item master and counterparty directory live outside the engine; the
//! factory only needs id → name/unit lookups to snapshot display names
//! onto the canonical order. Not authoritative for quantities — those live
//! in the inventory ledger.

use std::collections::HashMap;

/// Catalog metadata for one inventory item
#[derive(Debug, Clone)]
pub struct CatalogItemMeta {
    pub name: String,
    pub unit: String,
}

/// Injected lookup tables for the factory
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    items: HashMap<i64, CatalogItemMeta>,
    counterparties: HashMap<i64, String>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&mut self, id: i64, name: impl Into<String>, unit: impl Into<String>) {
        self.items.insert(
            id,
            CatalogItemMeta {
                name: name.into(),
                unit: unit.into(),
            },
        );
    }

    pub fn insert_counterparty(&mut self, id: i64, name: impl Into<String>) {
        self.counterparties.insert(id, name.into());
    }

    pub fn item(&self, id: i64) -> Option<&CatalogItemMeta> {
        self.items.get(&id)
    }

    pub fn counterparty_name(&self, id: i64) -> Option<&str> {
        self.counterparties.get(&id).map(String::as_str)
    }
}
