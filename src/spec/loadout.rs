//! Per-template loadout configuration
//!
//! A `LoadoutSpec` holds the configured equipment categories, condition
//! list, and global overrides for one character template. All mutation goes
//! through methods that raise the `modified` flag; the editing UI wraps
//! those calls with history snapshots.

use serde::{Deserialize, Serialize};

use super::condition::ConditionEntry;
use super::entry::{CountRange, ItemEntry, ItemSource};
use crate::catalog::Catalog;
use crate::core::types::{ItemId, ItemQuality, TemplateId};

/// Equipment category, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipCategory {
    RangedWeapon,
    MeleeWeapon,
    Armor,
    Clothing,
    Accessory,
}

impl EquipCategory {
    /// Fixed generation order
    pub const ALL: [EquipCategory; 5] = [
        EquipCategory::RangedWeapon,
        EquipCategory::MeleeWeapon,
        EquipCategory::Armor,
        EquipCategory::Clothing,
        EquipCategory::Accessory,
    ];

    /// Worn categories are cleared under a forced-naked override
    pub fn is_worn(&self) -> bool {
        matches!(
            self,
            EquipCategory::Armor | EquipCategory::Clothing | EquipCategory::Accessory
        )
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, EquipCategory::RangedWeapon | EquipCategory::MeleeWeapon)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EquipCategory::RangedWeapon => "ranged weapon",
            EquipCategory::MeleeWeapon => "melee weapon",
            EquipCategory::Armor => "armor",
            EquipCategory::Clothing => "clothing",
            EquipCategory::Accessory => "accessory",
        }
    }
}

/// Market-value interval a category may spend per character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendRange {
    pub min: f32,
    pub max: f32,
}

/// One category's configured entries, insertion-ordered for display
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub entries: Vec<ItemEntry>,
    /// Optional per-category spending budget
    #[serde(default)]
    pub spend: Option<SpendRange>,
}

/// Template-wide overrides applied across categories
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalOverrides {
    /// Clear all worn categories instead of selecting anything
    #[serde(default)]
    pub force_naked: bool,
    /// Treat empty configured categories as "equip nothing" rather than
    /// leaving the host default in place
    #[serde(default)]
    pub force_only_selected: bool,
    /// Fallback quality for any quality-capable item
    #[serde(default)]
    pub forced_quality: Option<ItemQuality>,
    /// Quality override for weapon categories, takes precedence over
    /// `forced_quality`
    #[serde(default)]
    pub forced_weapon_quality: Option<ItemQuality>,
    /// Apparel color override, host-interpreted
    #[serde(default)]
    pub forced_color: Option<String>,
    /// Probability of biocoding equipped weapons to the character
    #[serde(default)]
    pub biocode_chance: f32,
}

/// Configured loadout for one character template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadoutSpec {
    pub template: TemplateId,
    #[serde(default)]
    ranged: CategoryConfig,
    #[serde(default)]
    melee: CategoryConfig,
    #[serde(default)]
    armor: CategoryConfig,
    #[serde(default)]
    clothing: CategoryConfig,
    #[serde(default)]
    accessories: CategoryConfig,
    #[serde(default)]
    pub conditions: Vec<ConditionEntry>,
    #[serde(default)]
    pub overrides: GlobalOverrides,
    /// Session dirty marker, not persisted
    #[serde(skip)]
    pub modified: bool,
}

impl LoadoutSpec {
    pub fn new(template: TemplateId) -> Self {
        Self {
            template,
            ranged: CategoryConfig::default(),
            melee: CategoryConfig::default(),
            armor: CategoryConfig::default(),
            clothing: CategoryConfig::default(),
            accessories: CategoryConfig::default(),
            conditions: Vec::new(),
            overrides: GlobalOverrides::default(),
            modified: false,
        }
    }

    pub fn category(&self, category: EquipCategory) -> &CategoryConfig {
        match category {
            EquipCategory::RangedWeapon => &self.ranged,
            EquipCategory::MeleeWeapon => &self.melee,
            EquipCategory::Armor => &self.armor,
            EquipCategory::Clothing => &self.clothing,
            EquipCategory::Accessory => &self.accessories,
        }
    }

    fn category_mut(&mut self, category: EquipCategory) -> &mut CategoryConfig {
        match category {
            EquipCategory::RangedWeapon => &mut self.ranged,
            EquipCategory::MeleeWeapon => &mut self.melee,
            EquipCategory::Armor => &mut self.armor,
            EquipCategory::Clothing => &mut self.clothing,
            EquipCategory::Accessory => &mut self.accessories,
        }
    }

    /// Append an entry to a category, preserving display order
    pub fn add_entry(&mut self, category: EquipCategory, entry: ItemEntry) {
        self.category_mut(category).entries.push(entry);
        self.modified = true;
    }

    /// Remove the entry at `index`, if present
    pub fn remove_entry(&mut self, category: EquipCategory, index: usize) -> Option<ItemEntry> {
        let entries = &mut self.category_mut(category).entries;
        if index < entries.len() {
            let removed = entries.remove(index);
            self.modified = true;
            Some(removed)
        } else {
            None
        }
    }

    /// Mutable entry access for the edit path; marks the spec modified
    pub fn entry_mut(&mut self, category: EquipCategory, index: usize) -> Option<&mut ItemEntry> {
        self.modified = true;
        self.category_mut(category).entries.get_mut(index)
    }

    pub fn add_condition(&mut self, entry: ConditionEntry) {
        self.conditions.push(entry);
        self.modified = true;
    }

    pub fn remove_condition(&mut self, index: usize) -> Option<ConditionEntry> {
        if index < self.conditions.len() {
            self.modified = true;
            Some(self.conditions.remove(index))
        } else {
            None
        }
    }

    pub fn set_spend(&mut self, category: EquipCategory, spend: Option<SpendRange>) {
        self.category_mut(category).spend = spend;
        self.modified = true;
    }

    /// Replace the override block wholesale
    pub fn set_overrides(&mut self, overrides: GlobalOverrides) {
        self.overrides = overrides;
        self.modified = true;
    }

    pub fn set_force_naked(&mut self, value: bool) {
        self.overrides.force_naked = value;
        self.modified = true;
    }

    pub fn set_force_only_selected(&mut self, value: bool) {
        self.overrides.force_only_selected = value;
        self.modified = true;
    }

    pub fn set_forced_quality(&mut self, quality: Option<ItemQuality>) {
        self.overrides.forced_quality = quality;
        self.modified = true;
    }

    pub fn set_forced_weapon_quality(&mut self, quality: Option<ItemQuality>) {
        self.overrides.forced_weapon_quality = quality;
        self.modified = true;
    }

    /// Clamp a proposed count range against an allowed maximum.
    ///
    /// Never grows the range; callers pair this with the budget validator's
    /// outcome before committing.
    pub fn resolve_count_range(proposed: CountRange, max_allowed: u32) -> CountRange {
        proposed.clamped_to(max_allowed)
    }

    /// Visit every entry with its pool resolved to a concrete item id.
    ///
    /// Pool entries resolve to their heaviest current member so projections
    /// built on top never under-report. Entries whose pool is empty or
    /// whose item is missing from the catalog are skipped.
    pub fn for_each_resolved_entry<F>(&self, catalog: &dyn Catalog, mut f: F)
    where
        F: FnMut(EquipCategory, &ItemEntry, &ItemId),
    {
        for category in EquipCategory::ALL {
            for entry in &self.category(category).entries {
                match &entry.source {
                    ItemSource::Item(id) => f(category, entry, id),
                    ItemSource::Pool(tag) => {
                        let heaviest = catalog
                            .items_with_tag(tag)
                            .iter()
                            .filter_map(|id| catalog.item(id))
                            .max_by(|a, b| a.mass.total_cmp(&b.mass));
                        if let Some(def) = heaviest {
                            f(category, entry, &def.id);
                        }
                    }
                }
            }
        }
    }

    /// Total configured entries across all categories
    pub fn entry_count(&self) -> usize {
        EquipCategory::ALL
            .iter()
            .map(|c| self.category(*c).entries.len())
            .sum()
    }

    /// Reset to defaults in place, preserving identity and template id
    pub fn reset(&mut self) {
        let template = self.template.clone();
        *self = Self::new(template);
        self.modified = true;
    }
}
