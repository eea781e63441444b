//! Unit tests for workout rotation.

use rideplan::planning::{RotationHistory, RotationStrategy};
use rideplan::storage::RotationSettings;
use rideplan::workouts::{Intensity, Phase, WorkoutLibrary};

fn picks(settings: RotationSettings, weeks: u32, per_week: usize) -> Vec<String> {
    let library = WorkoutLibrary::builtin().unwrap();
    let pool = library.get_workouts_for_phase(Phase::Foundation, Intensity::Easy);
    let strategy = RotationStrategy::new(settings);
    let mut history = RotationHistory::new(3);

    let mut chosen = Vec::new();
    for week in 1..=weeks {
        history.begin_week(week);
        for _ in 0..per_week {
            let workout = strategy
                .select(&pool, Phase::Foundation, week, &mut history)
                .unwrap();
            chosen.push(workout.id.clone());
        }
    }
    chosen
}

#[test]
fn test_same_seed_same_picks() {
    let a = picks(RotationSettings::default(), 6, 2);
    let b = picks(RotationSettings::default(), 6, 2);
    assert_eq!(a, b);
}

#[test]
fn test_strict_variety_cycles_pool() {
    // four easy workouts, one pick per week: every one is used in four weeks
    let mut chosen = picks(RotationSettings::default(), 4, 1);
    chosen.sort();
    chosen.dedup();
    assert_eq!(chosen.len(), 4);
}

#[test]
fn test_recency_penalty_without_strict_variety() {
    let settings = RotationSettings {
        strict_variety: false,
        ..Default::default()
    };
    let library = WorkoutLibrary::builtin().unwrap();
    let workout = library.get_by_id("endurance_steady").unwrap();
    let strategy = RotationStrategy::new(settings);

    let mut history = RotationHistory::new(3);
    history.begin_week(1);
    history.record("endurance_steady");
    history.begin_week(2);
    history.record("endurance_steady");
    history.begin_week(3);

    assert_eq!(strategy.weight(workout, Phase::Foundation, &history), 0.25);
    // two weeks later the week-1 pick has left the window
    history.begin_week(5);
    assert_eq!(strategy.weight(workout, Phase::Foundation, &history), 0.5);
    let kept: Vec<u32> = history.weeks().map(|w| w.week_number).collect();
    assert_eq!(kept, vec![2, 3, 5]);
}

#[test]
fn test_history_round_trips_through_json() {
    let mut history = RotationHistory::new(3);
    history.begin_week(7);
    history.record("tempo_intervals");

    let json = serde_json::to_string(&history).unwrap();
    let restored: RotationHistory = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.recent_uses("tempo_intervals"), 1);
    assert_eq!(restored.current_week(), Some(7));
}
