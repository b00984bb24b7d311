//! Condition safety analysis
//!
//! Flags configured severity ranges that can drive a critical body capacity
//! toward zero. Purely advisory: results are surfaced to the editing UI and
//! never block generation or saving.

use crate::catalog::{CapacityKind, Catalog, ConditionDef};
use crate::core::types::ConditionId;
use crate::spec::{ConditionEntry, ConditionSource, SeverityRange};

/// Effective capacity below this produces a warning
pub const CAPACITY_WARN_THRESHOLD: f32 = 0.30;

/// Effective capacity at or below this escalates to critical
pub const CAPACITY_CRITICAL_THRESHOLD: f32 = 0.10;

/// How bad a flagged capacity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningLevel {
    Warning,
    Critical,
}

/// One flagged capacity for one condition
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionWarning {
    pub condition: ConditionId,
    pub capacity: CapacityKind,
    pub level: WarningLevel,
    /// Severity band of the stage that produced the flag
    pub min_severity: f32,
    pub max_severity: f32,
}

/// Check one condition definition against a configured severity range.
///
/// At most one warning per tracked capacity: among the candidates from all
/// intersecting stages, critical beats warning, and ties break toward the
/// lower stage severity since that outcome is reached sooner.
pub fn check_one(def: &ConditionDef, range: SeverityRange) -> Vec<ConditionWarning> {
    let mut winners: Vec<ConditionWarning> = Vec::new();

    for capacity in CapacityKind::TRACKED {
        let mut best: Option<ConditionWarning> = None;

        for (index, stage) in def.stages.iter().enumerate() {
            let stage_min = stage.min_severity;
            let stage_max = def.stage_max(index);
            if !band_intersects(stage_min, stage_max, range) {
                continue;
            }

            for modifier in &stage.modifiers {
                if modifier.capacity != capacity {
                    continue;
                }
                let mut effective = 1.0 + modifier.offset;
                if let Some(max) = modifier.set_max {
                    effective = effective.min(max);
                }
                if effective >= CAPACITY_WARN_THRESHOLD {
                    continue;
                }

                let level = if effective <= CAPACITY_CRITICAL_THRESHOLD {
                    WarningLevel::Critical
                } else {
                    WarningLevel::Warning
                };
                let candidate = ConditionWarning {
                    condition: def.id.clone(),
                    capacity,
                    level,
                    min_severity: stage_min,
                    max_severity: stage_max.min(1.0),
                };
                best = Some(match best.take() {
                    None => candidate,
                    Some(current) => more_severe(current, candidate),
                });
            }
        }

        if let Some(warning) = best {
            winners.push(warning);
        }
    }

    // A range that can reach the lethal severity is a consciousness kill,
    // whatever the stage modifiers say
    if let Some(lethal) = def.lethal_severity {
        if range.max >= lethal {
            let candidate = ConditionWarning {
                condition: def.id.clone(),
                capacity: CapacityKind::Consciousness,
                level: WarningLevel::Critical,
                min_severity: lethal,
                max_severity: 1.0,
            };
            match winners
                .iter_mut()
                .find(|w| w.capacity == CapacityKind::Consciousness)
            {
                Some(current) => *current = more_severe(current.clone(), candidate),
                None => winners.push(candidate),
            }
        }
    }

    winners
}

/// Check a whole condition list, expanding pool entries to their members.
///
/// The same most-severe-wins reduction runs across every entry, so the
/// result carries at most one warning per tracked capacity.
pub fn check_pool(catalog: &dyn Catalog, entries: &[ConditionEntry]) -> Vec<ConditionWarning> {
    let mut winners: Vec<ConditionWarning> = Vec::new();

    for entry in entries {
        let ids: Vec<ConditionId> = match &entry.source {
            ConditionSource::Condition(id) => vec![id.clone()],
            ConditionSource::Pool(tag) => catalog.conditions_with_tag(tag).to_vec(),
        };

        for id in ids {
            let Some(def) = catalog.condition(&id) else {
                tracing::warn!("skipping unknown condition in safety check: {}", id);
                continue;
            };
            for warning in check_one(def, entry.severity) {
                match winners.iter_mut().find(|w| w.capacity == warning.capacity) {
                    Some(current) => {
                        *current = more_severe(current.clone(), warning);
                    }
                    None => winners.push(warning),
                }
            }
        }
    }

    winners
}

/// Critical beats warning; equal levels break toward the lower band start
fn more_severe(a: ConditionWarning, b: ConditionWarning) -> ConditionWarning {
    if b.level > a.level || (b.level == a.level && b.min_severity < a.min_severity) {
        b
    } else {
        a
    }
}

/// Overlap test with boundary inclusion for point ranges
fn band_intersects(stage_min: f32, stage_max: f32, range: SeverityRange) -> bool {
    if range.is_point() {
        range.min >= stage_min && range.min < stage_max
    } else {
        stage_min < range.max && stage_max > range.min
    }
}
