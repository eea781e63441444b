//! Unit tests for workout library loading.

use std::collections::HashSet;

use rideplan::planning::PlanValidator;
use rideplan::workouts::{
    Intensity, LibraryError, MigrationRegistry, Phase, VariableKind, WorkoutLibrary,
};
use tempfile::TempDir;

const LEGACY_CATALOG: &str = r#"{
    "schema_version": "1.0",
    "workouts": [{
        "id": "legacy_endurance",
        "name": "Legacy Endurance",
        "description": "Zone 2",
        "workout_type": "endurance",
        "intensity": "easy",
        "suitable_phases": ["Foundation"],
        "fatigue": "low",
        "characteristics": { "technical_difficulty": "low" },
        "base_structure": {
            "warmup": [],
            "main_set": [{ "segment_type": "steady_state", "duration_min": 60, "power_low": 60, "power_high": 60 }],
            "cooldown": []
        },
        "variable_components": {
            "type": "Duration", "min": 30, "max": 120, "default": 60, "step": 10,
            "tss_per_unit": 0.6, "duration_per_unit": 1
        },
        "base_duration_min": 60,
        "base_tss": 36
    }]
}"#;

#[test]
fn test_builtin_catalog_is_consistent() {
    let library = WorkoutLibrary::builtin().unwrap();
    let report = PlanValidator::default().validate_library(library.all());
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let ids: HashSet<&str> = library.all().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids.len(), library.len());
}

#[test]
fn test_builtin_foundation_pools() {
    let library = WorkoutLibrary::builtin().unwrap();
    let hard = library.get_workouts_for_phase(Phase::Foundation, Intensity::Hard);
    let easy = library.get_workouts_for_phase(Phase::Foundation, Intensity::Easy);
    assert!(hard.len() >= 3);
    assert!(easy.len() >= 4);
    assert!(easy
        .iter()
        .all(|w| w.variable_component.kind == VariableKind::Duration));
}

#[test]
fn test_legacy_catalog_is_migrated() {
    let library = WorkoutLibrary::load(LEGACY_CATALOG).unwrap();
    assert_eq!(library.schema_version(), "2.0");

    let workout = library.get_by_id("legacy_endurance").unwrap();
    assert_eq!(workout.variable_component.kind, VariableKind::Duration);
    assert_eq!(workout.suitable_phases, vec![Phase::Foundation]);
}

#[test]
fn test_legacy_catalog_without_migration() {
    let err = WorkoutLibrary::load_with(LEGACY_CATALOG, "2.0", &MigrationRegistry::new())
        .unwrap_err();
    assert!(matches!(err, LibraryError::VersionError { .. }));
}

#[test]
fn test_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("workouts.json");
    std::fs::write(&path, LEGACY_CATALOG).unwrap();

    let library = WorkoutLibrary::load_file(&path).unwrap();
    assert_eq!(library.len(), 1);

    let missing = WorkoutLibrary::load_file(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(LibraryError::IoError(_))));
}

#[test]
fn test_malformed_json() {
    let err = WorkoutLibrary::load("{ not json").unwrap_err();
    assert!(matches!(err, LibraryError::ParseError(_)));
}
