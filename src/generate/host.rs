//! Host-side character interface
//!
//! The engine mutates a freshly instantiated character only through this
//! trait; the host owns equipment slots, body parts, and inventory.
//! `MemoryCharacter` is a plain in-memory implementation used by the
//! preview tool and tests.

use ahash::AHashMap;
use thiserror::Error;

use crate::core::types::{BodyPartId, ConditionId, ItemId, ItemQuality, MaterialId};
use crate::spec::EquipCategory;

/// A host operation refused the request
#[derive(Debug, Error)]
#[error("host rejected operation: {0}")]
pub struct HostError(pub String);

/// A concrete item ready to hand to the host
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedItem {
    pub item: ItemId,
    pub material: Option<MaterialId>,
    pub quality: Option<ItemQuality>,
    /// Host-interpreted apparel color
    pub color: Option<String>,
    /// Whether the item is biocoded to its wearer
    pub biocoded: bool,
}

/// Mutation surface the host exposes for one character
pub trait CharacterHandle {
    /// Equip into the category's slot, replacing any occupant. The host may
    /// reject (body-layer conflicts, missing body parts); rejections are
    /// skipped by the caller, never escalated.
    fn equip(&mut self, category: EquipCategory, item: MaterializedItem) -> Result<(), HostError>;

    /// Empty the category's slot
    fn clear_category(&mut self, category: EquipCategory);

    /// Distinct body locations the condition could attach to, excluding
    /// parts already bearing an incompatible condition
    fn valid_parts_for(&self, condition: &ConditionId) -> Vec<BodyPartId>;

    fn apply_condition(
        &mut self,
        condition: &ConditionId,
        severity: f32,
        part: &BodyPartId,
    ) -> Result<(), HostError>;

    fn add_to_inventory(&mut self, item: &ItemId, count: u32) -> Result<(), HostError>;
}

/// In-memory character with one slot per category and a humanoid part set
#[derive(Debug, Default)]
pub struct MemoryCharacter {
    slots: AHashMap<EquipCategory, MaterializedItem>,
    conditions: Vec<(ConditionId, f32, BodyPartId)>,
    inventory: Vec<(ItemId, u32)>,
    body_parts: Vec<BodyPartId>,
}

impl MemoryCharacter {
    pub fn new() -> Self {
        Self::with_parts(
            ["head", "torso", "left_arm", "right_arm", "left_leg", "right_leg"]
                .into_iter()
                .map(BodyPartId::new)
                .collect(),
        )
    }

    pub fn with_parts(body_parts: Vec<BodyPartId>) -> Self {
        Self {
            slots: AHashMap::new(),
            conditions: Vec::new(),
            inventory: Vec::new(),
            body_parts,
        }
    }

    pub fn equipped(&self, category: EquipCategory) -> Option<&MaterializedItem> {
        self.slots.get(&category)
    }

    pub fn conditions(&self) -> &[(ConditionId, f32, BodyPartId)] {
        &self.conditions
    }

    pub fn inventory(&self) -> &[(ItemId, u32)] {
        &self.inventory
    }
}

impl CharacterHandle for MemoryCharacter {
    fn equip(&mut self, category: EquipCategory, item: MaterializedItem) -> Result<(), HostError> {
        self.slots.insert(category, item);
        Ok(())
    }

    fn clear_category(&mut self, category: EquipCategory) {
        self.slots.remove(&category);
    }

    fn valid_parts_for(&self, condition: &ConditionId) -> Vec<BodyPartId> {
        // A part already bearing the same condition is incompatible
        self.body_parts
            .iter()
            .filter(|part| {
                !self
                    .conditions
                    .iter()
                    .any(|(c, _, p)| c == condition && p == *part)
            })
            .cloned()
            .collect()
    }

    fn apply_condition(
        &mut self,
        condition: &ConditionId,
        severity: f32,
        part: &BodyPartId,
    ) -> Result<(), HostError> {
        if !self.body_parts.contains(part) {
            return Err(HostError(format!("no such body part: {}", part)));
        }
        self.conditions.push((condition.clone(), severity, part.clone()));
        Ok(())
    }

    fn add_to_inventory(&mut self, item: &ItemId, count: u32) -> Result<(), HostError> {
        match self.inventory.iter_mut().find(|(id, _)| id == item) {
            Some((_, existing)) => *existing += count,
            None => self.inventory.push((item.clone(), count)),
        }
        Ok(())
    }
}
