//! Optional bulk/ammunition capability layer
//!
//! Some hosts run a third-party inventory system that adds carry bulk,
//! per-item carry caps, and ammunition. The engine depends only on this
//! trait; when no such layer is present the no-op implementation keeps
//! every bulk path disabled.

use ahash::AHashMap;

use crate::core::types::ItemId;

pub trait BulkAwareCompat {
    /// Whether the layer is present; bulk ceilings are only enforced when true
    fn is_active(&self) -> bool;

    /// Carry bulk per unit of the item
    fn unit_bulk(&self, item: &ItemId) -> f32;

    /// Per-item count cap the layer suggests, or `fallback` if it has none
    fn suggested_max_count(&self, item: &ItemId, fallback: u32) -> u32;

    /// Ammunition the given weapon fires, if the layer knows one
    fn ammo_for(&self, weapon: &ItemId) -> Option<ItemId>;
}

/// Substituted when no bulk-aware layer is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompat;

impl BulkAwareCompat for NoopCompat {
    fn is_active(&self) -> bool {
        false
    }

    fn unit_bulk(&self, _item: &ItemId) -> f32 {
        0.0
    }

    fn suggested_max_count(&self, _item: &ItemId, fallback: u32) -> u32 {
        fallback
    }

    fn ammo_for(&self, _weapon: &ItemId) -> Option<ItemId> {
        None
    }
}

/// Table-backed implementation for hosts that supply static data
#[derive(Debug, Clone, Default)]
pub struct StaticCompat {
    bulk: AHashMap<ItemId, f32>,
    max_counts: AHashMap<ItemId, u32>,
    ammo: AHashMap<ItemId, ItemId>,
}

impl StaticCompat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed bulk values from a catalog's item definitions; ammo tables and
    /// count caps still come from the host layer
    pub fn from_catalog(catalog: &crate::catalog::StaticCatalog) -> Self {
        let mut compat = Self::new();
        for def in catalog.items() {
            if def.bulk > 0.0 {
                compat.set_bulk(def.id.clone(), def.bulk);
            }
        }
        compat
    }

    pub fn set_bulk(&mut self, item: ItemId, bulk: f32) {
        self.bulk.insert(item, bulk);
    }

    pub fn set_max_count(&mut self, item: ItemId, cap: u32) {
        self.max_counts.insert(item, cap);
    }

    pub fn set_ammo(&mut self, weapon: ItemId, ammo: ItemId) {
        self.ammo.insert(weapon, ammo);
    }
}

impl BulkAwareCompat for StaticCompat {
    fn is_active(&self) -> bool {
        true
    }

    fn unit_bulk(&self, item: &ItemId) -> f32 {
        self.bulk.get(item).copied().unwrap_or(0.0)
    }

    fn suggested_max_count(&self, item: &ItemId, fallback: u32) -> u32 {
        self.max_counts.get(item).copied().unwrap_or(fallback)
    }

    fn ammo_for(&self, weapon: &ItemId) -> Option<ItemId> {
        self.ammo.get(weapon).cloned()
    }
}
