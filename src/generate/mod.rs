//! Loadout generation
//!
//! Runs once per host character-instantiation event: resolves the faction's
//! spec for the template, fills each equipment category by weighted draw,
//! rolls and applies conditions, and injects ammunition under a bulk-aware
//! host layer. Unconfigured templates are left entirely to host defaults.
//!
//! Worn-layer conflicts: the engine clears only the slot it is about to
//! fill (and every worn slot under a forced-naked override); cross-category
//! body-layer precedence is the host's to resolve, and a host rejection is
//! logged and skipped.
//!
//! Any single entry failure (missing definition, empty pool, host
//! rejection) is skipped so one bad entry never costs the character the
//! rest of its loadout.

pub mod host;

use rand::seq::SliceRandom;
use rand::Rng;

pub use host::{CharacterHandle, HostError, MaterializedItem, MemoryCharacter};

use crate::catalog::{Catalog, ItemDef};
use crate::compat::BulkAwareCompat;
use crate::core::types::{ConditionId, FactionId, ItemId, ItemQuality, TemplateId};
use crate::sampler;
use crate::spec::{
    CategoryConfig, ConfigStore, ConditionEntry, ConditionSource, EquipCategory, GlobalOverrides,
    ItemEntry, ItemSource, LoadoutSpec, SelectionMode,
};

/// Rounds per reload when the compat layer gives no per-item cap
const AMMO_RELOAD_UNITS: u32 = 30;

/// Reload count injected alongside an ammo-using weapon
const MIN_RELOADS: u32 = 2;
const MAX_RELOADS: u32 = 3;

/// Per-execution re-entrancy guard.
///
/// Equipping an item can make the host instantiate further characters while
/// a generation call is still on the stack; nested calls short-circuit to a
/// no-op. One context per logical execution flow, never shared.
#[derive(Debug, Default)]
pub struct GenerationContext {
    depth: u32,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

struct DepthGuard<'a>(&'a mut GenerationContext);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.depth -= 1;
    }
}

/// Materializes one character's loadout from the configuration store
pub struct LoadoutGenerator<'a> {
    catalog: &'a dyn Catalog,
    compat: &'a dyn BulkAwareCompat,
}

impl<'a> LoadoutGenerator<'a> {
    pub fn new(catalog: &'a dyn Catalog, compat: &'a dyn BulkAwareCompat) -> Self {
        Self { catalog, compat }
    }

    /// Populate `character` for one instantiation event.
    ///
    /// No-op when the faction carries no spec for the template, or when
    /// invoked re-entrantly from inside another generation call.
    pub fn generate(
        &self,
        store: &ConfigStore,
        faction: &FactionId,
        template: &TemplateId,
        character: &mut dyn CharacterHandle,
        ctx: &mut GenerationContext,
        rng: &mut impl Rng,
    ) {
        if ctx.depth > 0 {
            tracing::debug!(%template, "nested generation call short-circuited");
            return;
        }
        ctx.depth += 1;
        let _guard = DepthGuard(ctx);

        let Some(spec) = store.spec_for(faction, template) else {
            tracing::debug!(%faction, %template, "no loadout configured, leaving host defaults");
            return;
        };

        let equipped_ranged = self.fill_equipment(spec, character, rng);
        self.apply_conditions(spec, character, rng);
        self.inject_ammo(equipped_ranged.as_ref(), character, rng);
    }

    /// Fill each category in fixed order; returns the ranged weapon chosen
    fn fill_equipment(
        &self,
        spec: &LoadoutSpec,
        character: &mut dyn CharacterHandle,
        rng: &mut impl Rng,
    ) -> Option<ItemId> {
        let mut equipped_ranged = None;

        for category in EquipCategory::ALL {
            if spec.overrides.force_naked && category.is_worn() {
                character.clear_category(category);
                continue;
            }

            let config = spec.category(category);
            if config.entries.is_empty() {
                // Only override categories that carry data, unless the spec
                // demands exclusively its own selections
                if spec.overrides.force_only_selected {
                    character.clear_category(category);
                }
                continue;
            }

            let Some((item, entry)) = self.select_for_category(config, rng) else {
                continue;
            };
            let Some(def) = self.catalog.item(&item) else {
                tracing::warn!(%item, "selected item missing from catalog, skipping");
                continue;
            };

            let materialized = self.materialize(def, entry, category, &spec.overrides, rng);
            match character.equip(category, materialized) {
                Ok(()) => {
                    if category == EquipCategory::RangedWeapon {
                        equipped_ranged = Some(item);
                    }
                }
                Err(err) => {
                    tracing::warn!(%item, category = category.label(), %err, "equip rejected");
                }
            }
        }

        equipped_ranged
    }

    /// One weighted draw per category, with `AlwaysTake` entries preempting
    /// the rest and pool entries expanded to their current members
    fn select_for_category<'s>(
        &self,
        config: &'s CategoryConfig,
        rng: &mut impl Rng,
    ) -> Option<(ItemId, &'s ItemEntry)> {
        let always: Vec<&ItemEntry> = config
            .entries
            .iter()
            .filter(|e| e.mode == SelectionMode::AlwaysTake)
            .collect();
        let has_always = !always.is_empty();

        let eligible: Vec<&ItemEntry> = if has_always {
            always
        } else {
            config
                .entries
                .iter()
                .filter(|e| match e.mode {
                    SelectionMode::AlwaysTake => true,
                    SelectionMode::WeightedPick => true,
                    SelectionMode::ChanceBased => rng.gen::<f32>() < e.effective_chance(),
                })
                .collect()
        };

        let mut candidates: Vec<((ItemId, &ItemEntry), f32)> = Vec::new();
        for entry in eligible {
            match &entry.source {
                ItemSource::Item(id) => candidates.push(((id.clone(), entry), entry.weight)),
                ItemSource::Pool(tag) => {
                    let members = self.catalog.items_with_tag(tag);
                    if members.is_empty() {
                        tracing::warn!(%tag, "pool has no catalog members, skipping entry");
                    }
                    for id in members {
                        // Pool members inherit the pool entry's weight
                        candidates.push(((id.clone(), entry), entry.weight));
                    }
                }
            }
        }

        // A spending budget narrows the draw to affordable candidates. Soft
        // guidance only: an unaffordable-everything category falls back to
        // the full list, and always-take entries are never priced out.
        if !has_always {
            if let Some(spend) = config.spend {
                let budget = if spend.max > spend.min {
                    rng.gen_range(spend.min..=spend.max)
                } else {
                    spend.min
                };
                let affordable: Vec<((ItemId, &ItemEntry), f32)> = candidates
                    .iter()
                    .filter(|((id, _), _)| {
                        self.catalog
                            .item(id)
                            .is_some_and(|def| def.market_value <= budget)
                    })
                    .cloned()
                    .collect();
                if !affordable.is_empty() {
                    candidates = affordable;
                }
            }
        }

        sampler::draw(&candidates, rng).map(|(id, entry)| (id.clone(), *entry))
    }

    fn materialize(
        &self,
        def: &ItemDef,
        entry: &ItemEntry,
        category: EquipCategory,
        overrides: &GlobalOverrides,
        rng: &mut impl Rng,
    ) -> MaterializedItem {
        let material = entry
            .material
            .clone()
            .or_else(|| def.material_compatible.choose(rng).cloned());

        let quality = if def.quality_capable {
            resolve_quality(entry, category, overrides)
        } else {
            None
        };

        let color = if category.is_worn() {
            overrides.forced_color.clone()
        } else {
            None
        };

        let biocoded =
            category.is_weapon() && rng.gen::<f32>() < overrides.biocode_chance.clamp(0.0, 1.0);

        MaterializedItem {
            item: def.id.clone(),
            material,
            quality,
            color,
            biocoded,
        }
    }

    fn apply_conditions(
        &self,
        spec: &LoadoutSpec,
        character: &mut dyn CharacterHandle,
        rng: &mut impl Rng,
    ) {
        for entry in &spec.conditions {
            let Some(condition) = self.resolve_condition(entry, rng) else {
                continue;
            };
            if rng.gen::<f32>() >= entry.chance.clamp(0.0, 1.0) {
                continue;
            }

            let severity = entry.severity.sample(rng);
            let wanted = entry.parts_for_run(rng) as usize;
            let valid = character.valid_parts_for(&condition);
            if valid.is_empty() {
                tracing::warn!(%condition, "no valid body part, skipping condition");
                continue;
            }

            let chosen: Vec<_> = valid.choose_multiple(rng, wanted).cloned().collect();
            for part in chosen {
                if let Err(err) = character.apply_condition(&condition, severity, &part) {
                    tracing::warn!(%condition, %part, %err, "condition application rejected");
                }
            }
        }
    }

    /// Resolve a condition entry to one concrete condition id
    fn resolve_condition(&self, entry: &ConditionEntry, rng: &mut impl Rng) -> Option<ConditionId> {
        match &entry.source {
            ConditionSource::Condition(id) => {
                if self.catalog.condition(id).is_none() {
                    tracing::warn!(condition = %id, "unknown condition, skipping entry");
                    return None;
                }
                Some(id.clone())
            }
            ConditionSource::Pool(tag) => {
                let members = self.catalog.conditions_with_tag(tag);
                if members.is_empty() {
                    tracing::warn!(%tag, "condition pool has no members, skipping entry");
                    return None;
                }
                members.choose(rng).cloned()
            }
        }
    }

    /// Stock 2-3 reloads of the equipped weapon's ammunition
    fn inject_ammo(
        &self,
        weapon: Option<&ItemId>,
        character: &mut dyn CharacterHandle,
        rng: &mut impl Rng,
    ) {
        if !self.compat.is_active() {
            return;
        }
        let Some(ammo) = weapon.and_then(|w| self.compat.ammo_for(w)) else {
            return;
        };

        let reloads = rng.gen_range(MIN_RELOADS..=MAX_RELOADS);
        let count = (reloads * AMMO_RELOAD_UNITS).min(self.compat.suggested_max_count(&ammo, u32::MAX));
        if let Err(err) = character.add_to_inventory(&ammo, count) {
            tracing::warn!(%ammo, %err, "ammo injection rejected");
        }
    }
}

/// Quality precedence: entry override, then the weapon-specific template
/// override for weapon categories, then the generic template override
fn resolve_quality(
    entry: &ItemEntry,
    category: EquipCategory,
    overrides: &GlobalOverrides,
) -> Option<ItemQuality> {
    entry
        .quality
        .or(if category.is_weapon() {
            overrides.forced_weapon_quality
        } else {
            None
        })
        .or(overrides.forced_quality)
}
