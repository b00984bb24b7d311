//! Loadout configuration data model
//!
//! One `LoadoutSpec` per configured (faction, template) pair, owned by the
//! `ConfigStore`. Specs are plain serde data; derived state (inventory
//! stats, safety warnings) is recomputed elsewhere and never stored here.

pub mod condition;
pub mod entry;
pub mod loadout;
pub mod store;

pub use condition::{ConditionEntry, ConditionSource, SeverityRange};
pub use entry::{CountRange, ItemEntry, ItemSource, SelectionMode, MAX_WEIGHT, MIN_WEIGHT};
pub use loadout::{CategoryConfig, EquipCategory, GlobalOverrides, LoadoutSpec, SpendRange};
pub use store::ConfigStore;
