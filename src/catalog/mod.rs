//! Read-only definition catalog
//!
//! The catalog maps item and condition ids to their static properties. The
//! engine only ever queries it; the host (or data files) own its contents.
//! `Catalog` is the query seam, `StaticCatalog` the in-memory registry
//! loaded from TOML definition files.

pub mod registry;

use serde::{Deserialize, Serialize};

use crate::core::types::{ConditionId, ItemId, MaterialId, PoolTag};

pub use registry::{CatalogError, StaticCatalog};

/// Static properties of an equipment definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    #[serde(default)]
    pub label: String,
    /// Carry mass per unit, in mass-units
    pub mass: f32,
    /// Carry bulk per unit, only meaningful under a bulk-aware host layer
    #[serde(default)]
    pub bulk: f32,
    #[serde(default)]
    pub market_value: f32,
    #[serde(default)]
    pub tech_level: u8,
    /// Materials this item can be made from; empty = no substitution
    #[serde(default)]
    pub material_compatible: Vec<MaterialId>,
    /// Whether crafted quality applies to this item
    #[serde(default)]
    pub quality_capable: bool,
    /// Pool tags this item is a member of
    #[serde(default)]
    pub category_tags: Vec<PoolTag>,
}

/// Body function a condition stage can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityKind {
    Consciousness,
    Moving,
    Manipulation,
}

impl CapacityKind {
    /// The capacities tracked by the safety checker
    pub const TRACKED: [CapacityKind; 3] = [
        CapacityKind::Consciousness,
        CapacityKind::Moving,
        CapacityKind::Manipulation,
    ];
}

/// Per-stage effect on one capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityModifier {
    pub capacity: CapacityKind,
    /// Additive offset applied to the base capacity of 1.0
    #[serde(default)]
    pub offset: f32,
    /// Explicit ceiling on the resulting capacity, if the stage sets one
    #[serde(default)]
    pub set_max: Option<f32>,
}

/// One severity band of a staged condition.
///
/// A stage covers `[min_severity, next_stage.min_severity)`; the last stage
/// is open-ended. Stages are stored in ascending `min_severity` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionStage {
    pub min_severity: f32,
    #[serde(default)]
    pub modifiers: Vec<CapacityModifier>,
}

/// Static properties of a health condition definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDef {
    pub id: ConditionId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub stages: Vec<ConditionStage>,
    /// Severity at which the condition kills, if any
    #[serde(default)]
    pub lethal_severity: Option<f32>,
    /// Pool tags this condition is a member of
    #[serde(default)]
    pub category_tags: Vec<PoolTag>,
}

impl ConditionDef {
    /// Upper severity bound of the stage at `index`
    pub fn stage_max(&self, index: usize) -> f32 {
        self.stages
            .get(index + 1)
            .map(|next| next.min_severity)
            .unwrap_or(f32::INFINITY)
    }
}

/// Read-only query interface the engine depends on
pub trait Catalog {
    fn item(&self, id: &ItemId) -> Option<&ItemDef>;
    fn condition(&self, id: &ConditionId) -> Option<&ConditionDef>;
    /// Concrete items carrying the given pool tag, in registration order
    fn items_with_tag(&self, tag: &PoolTag) -> &[ItemId];
    /// Concrete conditions carrying the given pool tag, in registration order
    fn conditions_with_tag(&self, tag: &PoolTag) -> &[ConditionId];
}
