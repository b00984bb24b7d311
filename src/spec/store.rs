//! Configuration store
//!
//! Flat map from (faction, template) to `LoadoutSpec`, created lazily the
//! first time a template is edited. Generation reads through `spec_for` and
//! holds no long-lived references. Persisted as JSON between sessions.

use ahash::AHashMap;
use std::path::Path;

use super::loadout::LoadoutSpec;
use crate::core::error::Result;
use crate::core::types::{FactionId, TemplateId};

/// All configured loadouts, keyed faction-first
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfigStore {
    factions: AHashMap<FactionId, AHashMap<TemplateId, LoadoutSpec>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the faction carries any override configuration
    pub fn has_faction(&self, faction: &FactionId) -> bool {
        self.factions
            .get(faction)
            .is_some_and(|specs| !specs.is_empty())
    }

    /// The spec for a template, if one was ever configured
    pub fn spec_for(&self, faction: &FactionId, template: &TemplateId) -> Option<&LoadoutSpec> {
        self.factions.get(faction)?.get(template)
    }

    /// Fetch or lazily create the spec for an edit session
    pub fn get_or_create(
        &mut self,
        faction: &FactionId,
        template: &TemplateId,
    ) -> &mut LoadoutSpec {
        self.factions
            .entry(faction.clone())
            .or_default()
            .entry(template.clone())
            .or_insert_with(|| LoadoutSpec::new(template.clone()))
    }

    /// Reset a template's spec to defaults in place; no-op if unconfigured
    pub fn reset(&mut self, faction: &FactionId, template: &TemplateId) {
        if let Some(spec) = self
            .factions
            .get_mut(faction)
            .and_then(|specs| specs.get_mut(template))
        {
            spec.reset();
        }
    }

    /// Number of configured specs across all factions
    pub fn spec_count(&self) -> usize {
        self.factions.values().map(|m| m.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
