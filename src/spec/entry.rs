//! Equipment pool entries
//!
//! An entry names either one concrete item or a pool tag resolved at
//! generation time, plus the policy fields governing whether and how often
//! it is taken.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{ItemId, ItemQuality, MaterialId, PoolTag};

/// Lower clamp for entry weights
pub const MIN_WEIGHT: f32 = 0.1;

/// Upper clamp for entry weights
pub const MAX_WEIGHT: f32 = 10.0;

/// Policy governing how an entry enters a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionMode {
    /// Included in every run; the configured chance is ignored
    AlwaysTake,
    /// Included when an independent chance roll succeeds
    ChanceBased,
    /// Competes in the category-wide weighted draw
    #[default]
    WeightedPick,
}

/// Inclusive min/max count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    /// Build a range, swapping ends if given in reverse order
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn single() -> Self {
        Self { min: 1, max: 1 }
    }

    /// Clamp both ends to `max_allowed`, never growing the range
    pub fn clamped_to(self, max_allowed: u32) -> Self {
        Self {
            min: self.min.min(max_allowed),
            max: self.max.min(max_allowed),
        }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

impl Default for CountRange {
    fn default() -> Self {
        Self::single()
    }
}

/// What an entry resolves to at generation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemSource {
    /// One concrete catalog item
    Item(ItemId),
    /// A category tag expanded to its current catalog members
    Pool(PoolTag),
}

/// One configured equipment entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub source: ItemSource,
    /// Draw weight, clamped to [`MIN_WEIGHT`], [`MAX_WEIGHT`]
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub count: CountRange,
    /// Material override; `None` means a random compatible material
    #[serde(default)]
    pub material: Option<MaterialId>,
    /// Per-entry quality override
    #[serde(default)]
    pub quality: Option<ItemQuality>,
    #[serde(default)]
    pub mode: SelectionMode,
    /// Inclusion probability in [0, 1], used by `ChanceBased` mode
    #[serde(default = "default_chance")]
    pub chance: f32,
}

fn default_weight() -> f32 {
    1.0
}

fn default_chance() -> f32 {
    1.0
}

impl ItemEntry {
    pub fn item(id: impl Into<String>) -> Self {
        Self::new(ItemSource::Item(ItemId::new(id)))
    }

    pub fn pool(tag: impl Into<String>) -> Self {
        Self::new(ItemSource::Pool(PoolTag::new(tag)))
    }

    pub fn new(source: ItemSource) -> Self {
        Self {
            source,
            weight: default_weight(),
            count: CountRange::default(),
            material: None,
            quality: None,
            mode: SelectionMode::default(),
            chance: default_chance(),
        }
    }

    /// Set the draw weight, clamping into the allowed band
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
    }

    /// Inclusion chance with the `AlwaysTake` override applied
    pub fn effective_chance(&self) -> f32 {
        match self.mode {
            SelectionMode::AlwaysTake => 1.0,
            _ => self.chance.clamp(0.0, 1.0),
        }
    }
}
