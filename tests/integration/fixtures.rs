//! Week and library fixtures for integration tests.

use chrono::Weekday;
use rideplan::planning::WeekOverview;
use rideplan::workouts::{Phase, WorkoutLibrary};
use serde_json::json;

/// A week with explicit targets.
pub fn week(
    week_number: u32,
    phase: Phase,
    days: &[Weekday],
    hard_days: u32,
    easy_days: u32,
    target_tss: f64,
    total_hours: f64,
) -> WeekOverview {
    WeekOverview {
        week_number,
        phase,
        training_days: days.to_vec(),
        hard_days,
        easy_days,
        target_tss,
        total_hours,
    }
}

/// Two-workout library with hand-checkable load figures.
///
/// `threshold_block`: 15 min at 100% per set, 1-4 sets, 25 TSS per set.
/// `steady`: 60 min at 60%, 30-120 min, 0.6 TSS per minute.
pub fn minimal_library() -> WorkoutLibrary {
    let catalog = json!({
        "schema_version": "2.0",
        "workouts": [
            {
                "id": "threshold_block",
                "name": "Threshold Block",
                "description": "Blocks at FTP",
                "workout_type": "threshold",
                "intensity": "hard",
                "suitable_phases": ["foundation"],
                "characteristics": { "fatigue_cost": "high", "technical_difficulty": "medium" },
                "base_structure": {
                    "warmup": [],
                    "main_set": [{ "segment_type": "interval", "duration_min": 15, "power_low": 100, "power_high": 100 }],
                    "cooldown": []
                },
                "variable_component": {
                    "kind": "sets", "min": 1, "max": 4, "default": 2, "step": 1,
                    "tss_per_unit": 25, "duration_per_unit": 15
                },
                "base_duration_min": 30,
                "base_tss": 50,
                "progression": { "rule": "increase_sets", "increment": 2 }
            },
            {
                "id": "steady",
                "name": "Steady",
                "description": "Zone 2",
                "workout_type": "endurance",
                "intensity": "easy",
                "suitable_phases": ["foundation"],
                "characteristics": { "fatigue_cost": "low", "technical_difficulty": "low" },
                "base_structure": {
                    "warmup": [],
                    "main_set": [{ "segment_type": "steady_state", "duration_min": 60, "power_low": 60, "power_high": 60 }],
                    "cooldown": []
                },
                "variable_component": {
                    "kind": "duration", "min": 30, "max": 120, "default": 60, "step": 10,
                    "tss_per_unit": 0.6, "duration_per_unit": 1
                },
                "base_duration_min": 60,
                "base_tss": 36
            }
        ]
    });
    WorkoutLibrary::load(&catalog.to_string()).unwrap()
}
