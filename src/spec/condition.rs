//! Health condition entries

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entry::CountRange;
use crate::core::types::{ConditionId, PoolTag};

/// Inclusive severity interval in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityRange {
    pub min: f32,
    pub max: f32,
}

impl SeverityRange {
    /// Build a range clamped into [0, 1], swapping reversed ends
    pub fn new(min: f32, max: f32) -> Self {
        let a = min.clamp(0.0, 1.0);
        let b = max.clamp(0.0, 1.0);
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// True when the range is a single point
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.is_point() {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

impl Default for SeverityRange {
    fn default() -> Self {
        Self { min: 0.5, max: 1.0 }
    }
}

/// What a condition entry resolves to at generation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionSource {
    /// One concrete catalog condition
    Condition(ConditionId),
    /// A tag expanded to its members; one is drawn per run
    Pool(PoolTag),
}

/// One configured condition entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionEntry {
    pub source: ConditionSource,
    /// Application probability in [0, 1]
    #[serde(default = "default_chance")]
    pub chance: f32,
    #[serde(default)]
    pub severity: SeverityRange,
    /// Distinct body locations affected; only meaningful for pool entries,
    /// single-target entries always affect exactly one
    #[serde(default)]
    pub max_parts: CountRange,
}

fn default_chance() -> f32 {
    1.0
}

impl ConditionEntry {
    pub fn condition(id: impl Into<String>) -> Self {
        Self::new(ConditionSource::Condition(ConditionId::new(id)))
    }

    pub fn pool(tag: impl Into<String>) -> Self {
        Self::new(ConditionSource::Pool(PoolTag::new(tag)))
    }

    pub fn new(source: ConditionSource) -> Self {
        Self {
            source,
            chance: default_chance(),
            severity: SeverityRange::default(),
            max_parts: CountRange::single(),
        }
    }

    /// Body locations to affect for one successful roll
    pub fn parts_for_run(&self, rng: &mut impl Rng) -> u32 {
        match self.source {
            ConditionSource::Condition(_) => 1,
            ConditionSource::Pool(_) => self.max_parts.sample(rng).max(1),
        }
    }
}
