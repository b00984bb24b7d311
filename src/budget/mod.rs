//! Resource budget validation
//!
//! Projects a loadout's worst-case carry totals and classifies proposed
//! edits against the budget ceilings. The item-count ceiling is the only
//! hard stop; mass and bulk ceilings are soft guidance because the host
//! happily simulates an overloaded character. Totals are cached behind a
//! version counter bumped on every successful mutation.

use ahash::AHashSet;

use crate::catalog::Catalog;
use crate::compat::BulkAwareCompat;
use crate::core::types::ItemId;
use crate::spec::{CountRange, ItemEntry, ItemSource, LoadoutSpec};

/// Hard cap on total configured item count
pub const ITEM_COUNT_CEILING: u32 = 50;

/// Soft carry mass ceiling, in mass-units
pub const MASS_CEILING: f32 = 35.0;

/// Soft carry bulk ceiling, enforced only under an active bulk-aware layer
pub const BULK_CEILING: f32 = 50.0;

/// Mass/bulk past ceiling times this escalates the warning to critical
pub const CRITICAL_MULTIPLIER: f32 = 1.5;

/// Worst-case carry totals derived from a spec's maximum resolved counts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InventoryStats {
    pub total_mass: f32,
    pub total_bulk: f32,
    pub item_count: u32,
}

/// Outcome of an edit validation. Never an error; always a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    /// Valid, but a soft ceiling was exceeded
    Warning(String),
    /// Valid, but a soft ceiling was exceeded past the critical multiplier
    Critical(String),
    /// The edit must not be applied
    Rejected(String),
}

impl ValidationResult {
    /// Whether the proposed edit may be committed
    pub fn allows_commit(&self) -> bool {
        !matches!(self, ValidationResult::Rejected(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Warning(m)
            | ValidationResult::Critical(m)
            | ValidationResult::Rejected(m) => Some(m),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedStats {
    version: u64,
    stats: InventoryStats,
}

/// Validates proposed edits against the budget ceilings.
///
/// One validator per edited spec. Callers must `invalidate` after every
/// committed mutation; reads recompute when the cached version is stale.
#[derive(Debug, Default)]
pub struct BudgetValidator {
    version: u64,
    cache: Option<CachedStats>,
    missing_reported: AHashSet<ItemId>,
}

impl BudgetValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the version counter, staleing any cached stats
    pub fn invalidate(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Current worst-case totals, recomputed when stale
    pub fn stats(
        &mut self,
        spec: &LoadoutSpec,
        catalog: &dyn Catalog,
        compat: &dyn BulkAwareCompat,
    ) -> InventoryStats {
        if let Some(cached) = self.cache {
            if cached.version == self.version {
                return cached.stats;
            }
        }

        let stats = self.compute_stats(spec, catalog, compat);
        self.cache = Some(CachedStats {
            version: self.version,
            stats,
        });
        stats
    }

    fn compute_stats(
        &mut self,
        spec: &LoadoutSpec,
        catalog: &dyn Catalog,
        compat: &dyn BulkAwareCompat,
    ) -> InventoryStats {
        let mut stats = InventoryStats::default();
        let mut missing: Vec<ItemId> = Vec::new();

        spec.for_each_resolved_entry(catalog, |_category, entry, item| {
            let Some(def) = catalog.item(item) else {
                missing.push(item.clone());
                return;
            };
            let count = entry.count.max;
            stats.item_count += count;
            stats.total_mass += def.mass * count as f32;
            stats.total_bulk += compat.unit_bulk(item) * count as f32;
        });

        for item in missing {
            if self.missing_reported.insert(item.clone()) {
                tracing::warn!("skipping unknown item in stats: {}", item);
            }
        }

        tracing::debug!(
            items = stats.item_count,
            mass = stats.total_mass,
            bulk = stats.total_bulk,
            "recomputed inventory stats"
        );
        stats
    }

    /// Classify adding `add_count` units of `item` on top of the current spec
    pub fn validate_add(
        &mut self,
        spec: &LoadoutSpec,
        catalog: &dyn Catalog,
        compat: &dyn BulkAwareCompat,
        item: &ItemId,
        add_count: u32,
    ) -> ValidationResult {
        let current = self.stats(spec, catalog, compat);

        let projected_count = current.item_count + add_count;
        if projected_count > ITEM_COUNT_CEILING {
            return ValidationResult::Rejected(format!(
                "inventory item count limit exceeded (max {})",
                ITEM_COUNT_CEILING
            ));
        }

        let unit_mass = catalog.item(item).map(|def| def.mass).unwrap_or(0.0);
        let projected_mass = current.total_mass + unit_mass * add_count as f32;

        let mut criticals: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        classify_soft(
            "mass",
            projected_mass,
            MASS_CEILING,
            &mut warnings,
            &mut criticals,
        );

        if compat.is_active() {
            let projected_bulk = current.total_bulk + compat.unit_bulk(item) * add_count as f32;
            classify_soft(
                "bulk",
                projected_bulk,
                BULK_CEILING,
                &mut warnings,
                &mut criticals,
            );
        }

        if !criticals.is_empty() {
            criticals.extend(warnings);
            ValidationResult::Critical(criticals.join("; "))
        } else if !warnings.is_empty() {
            ValidationResult::Warning(warnings.join("; "))
        } else {
            ValidationResult::Valid
        }
    }

    /// Classify changing an entry's count range.
    ///
    /// Shrinking is always allowed without a recheck; only a grown maximum
    /// revalidates, as an add of the delta.
    pub fn validate_count_range_change(
        &mut self,
        spec: &LoadoutSpec,
        catalog: &dyn Catalog,
        compat: &dyn BulkAwareCompat,
        entry: &ItemEntry,
        new_range: CountRange,
    ) -> ValidationResult {
        if new_range.max <= entry.count.max {
            return ValidationResult::Valid;
        }

        let Some(item) = representative_item(entry, catalog) else {
            // Nothing resolvable to price the change against
            return ValidationResult::Valid;
        };
        self.validate_add(spec, catalog, compat, &item, new_range.max - entry.count.max)
    }

    /// Largest count the budget still permits for `item`, honoring any
    /// per-item cap the compat layer suggests
    pub fn max_allowed_count(
        &mut self,
        spec: &LoadoutSpec,
        catalog: &dyn Catalog,
        compat: &dyn BulkAwareCompat,
        item: &ItemId,
    ) -> u32 {
        let remaining = ITEM_COUNT_CEILING.saturating_sub(self.stats(spec, catalog, compat).item_count);
        compat.suggested_max_count(item, remaining).min(remaining)
    }
}

/// Worst-case item a pool entry can resolve to, for pricing projections
fn representative_item(entry: &ItemEntry, catalog: &dyn Catalog) -> Option<ItemId> {
    match &entry.source {
        ItemSource::Item(id) => Some(id.clone()),
        ItemSource::Pool(tag) => catalog
            .items_with_tag(tag)
            .iter()
            .filter_map(|id| catalog.item(id))
            .max_by(|a, b| a.mass.total_cmp(&b.mass))
            .map(|def| def.id.clone()),
    }
}

fn classify_soft(
    resource: &str,
    projected: f32,
    ceiling: f32,
    warnings: &mut Vec<String>,
    criticals: &mut Vec<String>,
) {
    if projected > ceiling * CRITICAL_MULTIPLIER {
        criticals.push(format!(
            "{} {:.1} is far past the ceiling of {:.0}",
            resource, projected, ceiling
        ));
    } else if projected > ceiling {
        warnings.push(format!(
            "{} {:.1} exceeds the ceiling of {:.0}",
            resource, projected, ceiling
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDef, StaticCatalog};
    use crate::compat::{NoopCompat, StaticCompat};
    use crate::core::types::TemplateId;
    use crate::spec::EquipCategory;

    fn item(id: &str, mass: f32) -> ItemDef {
        ItemDef {
            id: ItemId::new(id),
            label: String::new(),
            mass,
            bulk: 0.0,
            market_value: 0.0,
            tech_level: 0,
            material_compatible: vec![],
            quality_capable: false,
            category_tags: vec![],
        }
    }

    fn catalog() -> StaticCatalog {
        let mut catalog = StaticCatalog::new();
        catalog.add_item(item("pebble", 0.1)).unwrap();
        catalog.add_item(item("brick", 2.0)).unwrap();
        catalog.add_item(item("anvil", 40.0)).unwrap();
        catalog
    }

    fn spec_with_counted(id: &str, max: u32) -> LoadoutSpec {
        let mut spec = LoadoutSpec::new(TemplateId::new("raider"));
        let mut entry = ItemEntry::item(id);
        entry.count = CountRange::new(1, max);
        spec.add_entry(EquipCategory::Accessory, entry);
        spec
    }

    #[test]
    fn test_count_ceiling_is_hard() {
        let catalog = catalog();
        let mut validator = BudgetValidator::new();
        let spec = spec_with_counted("pebble", 49);

        let over = validator.validate_add(&spec, &catalog, &NoopCompat, &ItemId::new("pebble"), 2);
        assert!(matches!(over, ValidationResult::Rejected(_)));

        let at = validator.validate_add(&spec, &catalog, &NoopCompat, &ItemId::new("pebble"), 1);
        assert!(at.allows_commit());
        assert!(!matches!(at, ValidationResult::Rejected(_)));
    }

    #[test]
    fn test_mass_ceiling_is_soft() {
        let catalog = catalog();
        let mut validator = BudgetValidator::new();
        // 17 bricks = 34 mass, one below the ceiling
        let spec = spec_with_counted("brick", 17);

        let warned = validator.validate_add(&spec, &catalog, &NoopCompat, &ItemId::new("brick"), 1);
        assert!(matches!(warned, ValidationResult::Warning(_)));
        assert!(warned.allows_commit());

        // 34 + 40 = 74 > 52.5 critical threshold
        let critical =
            validator.validate_add(&spec, &catalog, &NoopCompat, &ItemId::new("anvil"), 1);
        assert!(matches!(critical, ValidationResult::Critical(_)));
        assert!(critical.allows_commit());
    }

    #[test]
    fn test_bulk_only_checked_when_compat_active() {
        let catalog = catalog();
        let mut compat = StaticCompat::new();
        compat.set_bulk(ItemId::new("brick"), 60.0);

        let spec = spec_with_counted("pebble", 1);

        let mut validator = BudgetValidator::new();
        let inert = validator.validate_add(&spec, &catalog, &NoopCompat, &ItemId::new("brick"), 1);
        assert_eq!(inert, ValidationResult::Valid);

        let mut validator = BudgetValidator::new();
        let flagged = validator.validate_add(&spec, &catalog, &compat, &ItemId::new("brick"), 1);
        assert!(matches!(flagged, ValidationResult::Warning(_)));
    }

    #[test]
    fn test_shrinking_range_skips_revalidation() {
        let catalog = catalog();
        let mut validator = BudgetValidator::new();
        let spec = spec_with_counted("anvil", 10);
        let entry = &spec.category(EquipCategory::Accessory).entries[0];

        // Even on a grossly overweight spec, shrinking is always valid
        let result = validator.validate_count_range_change(
            &spec,
            &catalog,
            &NoopCompat,
            entry,
            CountRange::new(1, 5),
        );
        assert_eq!(result, ValidationResult::Valid);

        // Growing revalidates the delta
        let grown = validator.validate_count_range_change(
            &spec,
            &catalog,
            &NoopCompat,
            entry,
            CountRange::new(1, 12),
        );
        assert!(matches!(grown, ValidationResult::Critical(_)));
    }

    #[test]
    fn test_stats_cache_recomputes_after_invalidate() {
        let catalog = catalog();
        let mut validator = BudgetValidator::new();
        let mut spec = spec_with_counted("brick", 2);

        let before = validator.stats(&spec, &catalog, &NoopCompat);
        assert_eq!(before.item_count, 2);
        assert_eq!(before.total_mass, 4.0);

        // Mutate without invalidating: cached totals still served
        let mut extra = ItemEntry::item("brick");
        extra.count = CountRange::new(1, 3);
        spec.add_entry(EquipCategory::Clothing, extra);
        assert_eq!(validator.stats(&spec, &catalog, &NoopCompat), before);

        validator.invalidate();
        let after = validator.stats(&spec, &catalog, &NoopCompat);
        assert_eq!(after.item_count, 5);
        assert_eq!(after.total_mass, 10.0);
    }

    #[test]
    fn test_missing_item_skipped_in_stats() {
        let catalog = catalog();
        let mut validator = BudgetValidator::new();
        let mut spec = spec_with_counted("brick", 1);
        spec.add_entry(EquipCategory::Accessory, ItemEntry::item("no_such_item"));

        let stats = validator.stats(&spec, &catalog, &NoopCompat);
        assert_eq!(stats.item_count, 1);
        assert_eq!(stats.total_mass, 2.0);
    }

    #[test]
    fn test_pool_entry_priced_at_heaviest_member() {
        let mut catalog = StaticCatalog::new();
        catalog
            .add_item(ItemDef {
                category_tags: vec![crate::core::types::PoolTag::new("junk")],
                ..item("light_junk", 1.0)
            })
            .unwrap();
        catalog
            .add_item(ItemDef {
                category_tags: vec![crate::core::types::PoolTag::new("junk")],
                ..item("heavy_junk", 9.0)
            })
            .unwrap();

        let mut spec = LoadoutSpec::new(TemplateId::new("raider"));
        let mut entry = ItemEntry::pool("junk");
        entry.count = CountRange::new(1, 2);
        spec.add_entry(EquipCategory::Accessory, entry);

        let mut validator = BudgetValidator::new();
        let stats = validator.stats(&spec, &catalog, &NoopCompat);
        assert_eq!(stats.total_mass, 18.0);
    }

    #[test]
    fn test_max_allowed_count_honors_compat_cap() {
        let catalog = catalog();
        let spec = spec_with_counted("pebble", 10);
        let mut compat = StaticCompat::new();
        compat.set_max_count(ItemId::new("pebble"), 25);

        let mut validator = BudgetValidator::new();
        // 40 slots remain but the layer caps this item at 25
        assert_eq!(
            validator.max_allowed_count(&spec, &catalog, &compat, &ItemId::new("pebble")),
            25
        );
        assert_eq!(
            validator.max_allowed_count(&spec, &catalog, &NoopCompat, &ItemId::new("pebble")),
            40
        );
    }
}
