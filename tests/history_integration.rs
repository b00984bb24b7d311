//! Undo/redo round-trip guarantees
//!
//! Any sequence of recorded mutations must unwind field-for-field to the
//! original state, and replay field-for-field to the final state.

use proptest::prelude::*;

use outfitter::core::types::TemplateId;
use outfitter::history::EditHistoryManager;
use outfitter::spec::{
    ConditionEntry, CountRange, EquipCategory, ItemEntry, LoadoutSpec, SeverityRange,
};

/// One UI-level edit applied under a history record
#[derive(Debug, Clone)]
enum Edit {
    AddItem(EquipCategory, String),
    RemoveFirst(EquipCategory),
    AddCondition(String, f32),
    SetForceNaked(bool),
    SetCount(EquipCategory, u32, u32),
}

fn apply(spec: &mut LoadoutSpec, edit: &Edit) {
    match edit {
        Edit::AddItem(category, id) => {
            spec.add_entry(*category, ItemEntry::item(id.clone()));
        }
        Edit::RemoveFirst(category) => {
            spec.remove_entry(*category, 0);
        }
        Edit::AddCondition(id, severity) => {
            let mut entry = ConditionEntry::condition(id.clone());
            entry.severity = SeverityRange::new(*severity, 1.0);
            spec.add_condition(entry);
        }
        Edit::SetForceNaked(value) => {
            spec.set_force_naked(*value);
        }
        Edit::SetCount(category, min, max) => {
            if let Some(entry) = spec.entry_mut(*category, 0) {
                entry.count = CountRange::new(*min, *max);
            }
        }
    }
}

fn category_strategy() -> impl Strategy<Value = EquipCategory> {
    prop_oneof![
        Just(EquipCategory::RangedWeapon),
        Just(EquipCategory::MeleeWeapon),
        Just(EquipCategory::Armor),
        Just(EquipCategory::Clothing),
        Just(EquipCategory::Accessory),
    ]
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (category_strategy(), "[a-z]{3,10}").prop_map(|(c, id)| Edit::AddItem(c, id)),
        category_strategy().prop_map(Edit::RemoveFirst),
        ("[a-z]{3,10}", 0.0f32..1.0).prop_map(|(id, s)| Edit::AddCondition(id, s)),
        any::<bool>().prop_map(Edit::SetForceNaked),
        (category_strategy(), 1u32..5, 1u32..10).prop_map(|(c, min, max)| Edit::SetCount(c, min, max)),
    ]
}

proptest! {
    /// k edits, k undos, k redos: original and final states are exact.
    #[test]
    fn prop_undo_redo_round_trip(edits in prop::collection::vec(edit_strategy(), 1..20)) {
        let mut spec = LoadoutSpec::new(TemplateId::new("raider"));
        let mut history = EditHistoryManager::new();
        let original = spec.clone();

        for edit in &edits {
            history.record_state(&spec);
            apply(&mut spec, edit);
        }
        let final_state = spec.clone();

        for _ in &edits {
            prop_assert!(history.undo(&mut spec));
        }
        prop_assert_eq!(&spec, &original);

        for _ in &edits {
            prop_assert!(history.redo(&mut spec));
        }
        prop_assert_eq!(&spec, &final_state);
    }
}

/// Interleaving undo and redo mid-sequence keeps states exact.
#[test]
fn test_interleaved_undo_redo() {
    let mut spec = LoadoutSpec::new(TemplateId::new("guard"));
    let mut history = EditHistoryManager::new();

    history.record_state(&spec);
    spec.add_entry(EquipCategory::RangedWeapon, ItemEntry::item("rifle"));
    let after_rifle = spec.clone();

    history.record_state(&spec);
    spec.add_entry(EquipCategory::Armor, ItemEntry::item("vest"));
    let after_vest = spec.clone();

    history.undo(&mut spec);
    assert_eq!(spec, after_rifle);

    history.redo(&mut spec);
    assert_eq!(spec, after_vest);

    history.undo(&mut spec);
    history.undo(&mut spec);
    assert_eq!(spec, LoadoutSpec::new(TemplateId::new("guard")));
}

/// A fresh edit after undo forks history: redo becomes unavailable.
#[test]
fn test_edit_after_undo_discards_redo_branch() {
    let mut spec = LoadoutSpec::new(TemplateId::new("guard"));
    let mut history = EditHistoryManager::new();

    history.record_state(&spec);
    spec.add_entry(EquipCategory::Armor, ItemEntry::item("vest"));

    history.undo(&mut spec);

    history.record_state(&spec);
    spec.add_entry(EquipCategory::Armor, ItemEntry::item("plate"));

    assert!(!history.can_redo());
    assert!(!history.redo(&mut spec));
    assert_eq!(
        spec.category(EquipCategory::Armor).entries[0],
        ItemEntry::item("plate")
    );
}
