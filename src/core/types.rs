//! Core identifier types used throughout the codebase
//!
//! Ids name definitions in the external catalog (items, conditions,
//! materials) or host-side objects (templates, factions, body parts).
//! They are plain def-name strings, never synthesized.

use serde::{Deserialize, Serialize};

macro_rules! def_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

def_id! {
    /// Character archetype the host instantiates many times
    TemplateId
}

def_id! {
    /// Owning group whose templates may carry loadout overrides
    FactionId
}

def_id! {
    /// Equipment definition in the catalog
    ItemId
}

def_id! {
    /// Health condition definition in the catalog
    ConditionId
}

def_id! {
    /// Crafting material an item may be made from
    MaterialId
}

def_id! {
    /// Category tag resolved to concrete catalog members at generation time
    PoolTag
}

def_id! {
    /// Host-side body location a condition can attach to
    BodyPartId
}

/// Crafted quality tier for quality-capable items
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum ItemQuality {
    Awful,
    Poor,
    #[default]
    Normal,
    Good,
    Excellent,
    Masterwork,
    Legendary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_equality() {
        let a = ItemId::new("rifle");
        let b = ItemId::from("rifle");
        let c = ItemId::new("pistol");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_id_hash_as_map_key() {
        use std::collections::HashMap;
        let mut map: HashMap<TemplateId, &str> = HashMap::new();
        map.insert(TemplateId::new("raider"), "configured");
        assert_eq!(map.get(&TemplateId::new("raider")), Some(&"configured"));
    }

    #[test]
    fn test_quality_ordering() {
        assert!(ItemQuality::Legendary > ItemQuality::Masterwork);
        assert!(ItemQuality::Normal > ItemQuality::Poor);
        assert_eq!(ItemQuality::default(), ItemQuality::Normal);
    }
}
