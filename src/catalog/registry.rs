//! In-memory catalog registry with TOML definition loading
//!
//! Definition files carry `[[items]]` and `[[conditions]]` tables. The
//! registry keeps a per-tag index so pool expansion is a lookup, not a scan.

use ahash::AHashMap;
use std::path::Path;
use thiserror::Error;

use super::{Catalog, ConditionDef, ItemDef};
use crate::core::types::{ConditionId, ItemId, PoolTag};

/// Errors that can occur when building or loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Duplicate definition: {0}")]
    Duplicate(String),
}

#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemDef>,
    #[serde(default)]
    conditions: Vec<ConditionDef>,
}

/// Catalog backed by plain maps, filled from definition files or code
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: AHashMap<ItemId, ItemDef>,
    conditions: AHashMap<ConditionId, ConditionDef>,
    items_by_tag: AHashMap<PoolTag, Vec<ItemId>>,
    conditions_by_tag: AHashMap<PoolTag, Vec<ConditionId>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item definition, indexing its pool tags
    pub fn add_item(&mut self, def: ItemDef) -> Result<(), CatalogError> {
        if self.items.contains_key(&def.id) {
            return Err(CatalogError::Duplicate(def.id.to_string()));
        }
        for tag in &def.category_tags {
            self.items_by_tag
                .entry(tag.clone())
                .or_default()
                .push(def.id.clone());
        }
        self.items.insert(def.id.clone(), def);
        Ok(())
    }

    /// Register a condition definition, indexing its pool tags
    pub fn add_condition(&mut self, def: ConditionDef) -> Result<(), CatalogError> {
        if self.conditions.contains_key(&def.id) {
            return Err(CatalogError::Duplicate(def.id.to_string()));
        }
        for tag in &def.category_tags {
            self.conditions_by_tag
                .entry(tag.clone())
                .or_default()
                .push(def.id.clone());
        }
        self.conditions.insert(def.id.clone(), def);
        Ok(())
    }

    /// Load definitions from a TOML string, merging into this catalog
    pub fn load_from_toml(&mut self, content: &str) -> Result<(), CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        for item in file.items {
            self.add_item(item)?;
        }
        for condition in file.conditions {
            self.add_condition(condition)?;
        }
        Ok(())
    }

    /// Load definitions from a TOML file on disk
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.load_from_toml(&content)
    }

    /// Iterate all registered item definitions, in no particular order
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }
}

impl Catalog for StaticCatalog {
    fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    fn condition(&self, id: &ConditionId) -> Option<&ConditionDef> {
        self.conditions.get(id)
    }

    fn items_with_tag(&self, tag: &PoolTag) -> &[ItemId] {
        self.items_by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    fn conditions_with_tag(&self, tag: &PoolTag) -> &[ConditionId] {
        self.conditions_by_tag
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rifle() -> ItemDef {
        ItemDef {
            id: ItemId::new("rifle"),
            label: "Rifle".to_string(),
            mass: 3.5,
            bulk: 7.0,
            market_value: 400.0,
            tech_level: 4,
            material_compatible: vec![],
            quality_capable: true,
            category_tags: vec![PoolTag::new("weapon_ranged")],
        }
    }

    #[test]
    fn test_add_and_lookup_item() {
        let mut catalog = StaticCatalog::new();
        catalog.add_item(rifle()).unwrap();

        let def = catalog.item(&ItemId::new("rifle")).unwrap();
        assert_eq!(def.mass, 3.5);
        assert!(def.quality_capable);
        assert!(catalog.item(&ItemId::new("missing")).is_none());
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let mut catalog = StaticCatalog::new();
        catalog.add_item(rifle()).unwrap();
        assert!(matches!(
            catalog.add_item(rifle()),
            Err(CatalogError::Duplicate(_))
        ));
    }

    #[test]
    fn test_tag_index_preserves_registration_order() {
        let mut catalog = StaticCatalog::new();
        catalog.add_item(rifle()).unwrap();
        catalog
            .add_item(ItemDef {
                id: ItemId::new("pistol"),
                mass: 1.2,
                category_tags: vec![PoolTag::new("weapon_ranged")],
                ..rifle()
            })
            .unwrap();

        let members = catalog.items_with_tag(&PoolTag::new("weapon_ranged"));
        assert_eq!(members, &[ItemId::new("rifle"), ItemId::new("pistol")]);
        assert!(catalog.items_with_tag(&PoolTag::new("no_such_tag")).is_empty());
    }

    #[test]
    fn test_load_from_toml() {
        let mut catalog = StaticCatalog::new();
        catalog
            .load_from_toml(
                r#"
                [[items]]
                id = "helmet"
                mass = 1.0
                category_tags = ["armor"]

                [[conditions]]
                id = "old_scar"
                stages = [{ min_severity = 0.0 }]
                "#,
            )
            .unwrap();

        assert_eq!(catalog.item_count(), 1);
        assert_eq!(catalog.condition_count(), 1);
        assert!(catalog.condition(&ConditionId::new("old_scar")).is_some());
    }

    #[test]
    fn test_stage_max_open_ended() {
        use crate::catalog::ConditionStage;

        let def = ConditionDef {
            id: ConditionId::new("bad_back"),
            label: String::new(),
            stages: vec![
                ConditionStage {
                    min_severity: 0.0,
                    modifiers: vec![],
                },
                ConditionStage {
                    min_severity: 0.5,
                    modifiers: vec![],
                },
            ],
            lethal_severity: None,
            category_tags: vec![],
        };

        assert_eq!(def.stage_max(0), 0.5);
        assert_eq!(def.stage_max(1), f32::INFINITY);
    }
}
