//! Unit tests for phase progression.

use chrono::Weekday::*;
use rideplan::planning::{PhaseCalendar, ProgressiveOverloadPolicy, WeekOverview};
use rideplan::workouts::{Phase, WorkoutLibrary};

fn week(week_number: u32, phase: Phase) -> WeekOverview {
    WeekOverview {
        week_number,
        phase,
        training_days: vec![Tue, Thu, Sat],
        hard_days: 1,
        easy_days: 2,
        target_tss: 200.0,
        total_hours: 5.0,
    }
}

fn calendar() -> PhaseCalendar {
    let phases = [
        Phase::Foundation,
        Phase::Foundation,
        Phase::Foundation,
        Phase::Recovery,
        Phase::Build,
        Phase::Build,
        Phase::Build,
        Phase::Build,
        Phase::Build,
    ];
    let weeks: Vec<WeekOverview> = phases
        .iter()
        .enumerate()
        .map(|(i, phase)| week(i as u32 + 1, *phase))
        .collect();
    PhaseCalendar::from_weeks(&weeks)
}

#[test]
fn test_calendar_groups_runs() {
    let calendar = calendar();
    let spans: Vec<(Phase, u32, u32)> = calendar
        .spans()
        .iter()
        .map(|s| (s.phase, s.start_week, s.end_week))
        .collect();
    assert_eq!(
        spans,
        vec![
            (Phase::Foundation, 1, 3),
            (Phase::Recovery, 4, 4),
            (Phase::Build, 5, 9)
        ]
    );
    assert_eq!(calendar.total_weeks(), 9);
}

#[test]
fn test_build_progression_non_decreasing() {
    let library = WorkoutLibrary::builtin().unwrap();
    let workout = library.get_by_id("vo2max_intervals").unwrap();
    let calendar = calendar();
    let policy = ProgressiveOverloadPolicy::new();

    let values: Vec<u32> = (5..=9)
        .map(|n| {
            policy
                .apply(workout, n, Phase::Build, &calendar)
                .variable_component
                .default
        })
        .collect();

    assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
    assert_eq!(values.first(), Some(&5));
    assert_eq!(values.last(), Some(&8));
}

#[test]
fn test_duration_progression_moves_base_figures() {
    let library = WorkoutLibrary::builtin().unwrap();
    let workout = library.get_by_id("endurance_steady").unwrap();
    let calendar = calendar();

    let progressed = ProgressiveOverloadPolicy::new().apply(workout, 3, Phase::Foundation, &calendar);
    assert_eq!(progressed.variable_component.default, 90);
    assert!((progressed.base_duration_min - 110.0).abs() < 1e-9);
    assert!(progressed.base_tss > workout.base_tss);
}

#[test]
fn test_week_outside_phase_is_unchanged() {
    let library = WorkoutLibrary::builtin().unwrap();
    let workout = library.get_by_id("sweet_spot_foundation").unwrap();
    let calendar = calendar();

    let progressed = ProgressiveOverloadPolicy::new().apply(workout, 4, Phase::Foundation, &calendar);
    assert_eq!(progressed, *workout);
}
