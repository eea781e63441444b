//! Integration tests for rendered plan output.

use chrono::Weekday::*;
use rideplan::planning::generate_plan;
use rideplan::storage::PlannerConfig;
use rideplan::workouts::{Phase, WorkoutLibrary};

use crate::fixtures::{minimal_library, week};

#[test]
fn test_rendered_week_shape() {
    let library = WorkoutLibrary::builtin().unwrap();
    let weeks = vec![week(1, Phase::Foundation, &[Tue, Thu, Sat, Sun], 1, 3, 200.0, 5.0)];
    let plan = generate_plan(&library, &PlannerConfig::default(), &weeks);

    let rendered = plan.render(250);
    let json = serde_json::to_value(&rendered).unwrap();
    let workouts = json[0]["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 4);

    for workout in workouts {
        for key in ["weekday", "name", "description", "total_duration_min", "tss", "segments"] {
            assert!(workout.get(key).is_some(), "missing {key}");
        }
        let segment = &workout["segments"][0];
        for key in ["type", "duration_min", "power_low", "power_high", "description"] {
            assert!(segment.get(key).is_some(), "missing {key}");
        }
    }
}

#[test]
fn test_watts_follow_ftp() {
    let library = minimal_library();
    let weeks = vec![week(1, Phase::Foundation, &[Tue], 1, 0, 50.0, 0.5)];
    let plan = generate_plan(&library, &PlannerConfig::default(), &weeks);

    let week = &plan.render(280)[0];
    let interval = &week.workouts[0].segments[0];
    assert_eq!(interval.power_low_watts, 280);
    assert_eq!(interval.power_high_watts, 280);
    assert_eq!(week.workouts[0].segments.len(), 2);
    assert_eq!(week.workouts[0].segments[1].description, "Set 2/2");
}

#[test]
fn test_failed_week_renders_error() {
    let library = minimal_library();
    let weeks = vec![week(1, Phase::Foundation, &[Tue], 1, 0, 500.0, 1.0)];
    let plan = generate_plan(&library, &PlannerConfig::default(), &weeks);

    let json = serde_json::to_value(plan.render(250)).unwrap();
    assert_eq!(json[0]["errors"][0]["kind"], "infeasible_target");
    assert!(json[0]["workouts"].as_array().unwrap().is_empty());
}
