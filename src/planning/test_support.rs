//! Workout and week fixtures shared by the planning unit tests.

use chrono::Weekday;

use super::week::WeekOverview;
use crate::workouts::{
    BaseStructure, Characteristics, Intensity, Level, Phase, SegmentTemplate, SegmentType,
    VariableComponent, VariableKind, Workout,
};

fn segment(segment_type: SegmentType, minutes: f64, low: f64, high: f64) -> SegmentTemplate {
    SegmentTemplate {
        segment_type,
        duration_min: minutes,
        power_low: low,
        power_high: high,
        description: String::new(),
    }
}

/// 5 × (4 min VO2 + 4 min easy), 3-8 sets, 60 min / 62.3 TSS at default.
pub fn hard_intervals(id: &str) -> Workout {
    Workout {
        id: id.to_string(),
        name: format!("Intervals {id}"),
        description: "Short efforts above threshold".to_string(),
        workout_type: "vo2max".to_string(),
        intensity: Intensity::Hard,
        suitable_phases: vec![Phase::Foundation, Phase::Build, Phase::Peak],
        suitable_weekdays: vec![],
        characteristics: Characteristics {
            fatigue_cost: Level::High,
            technical_difficulty: Level::Medium,
            equipment: vec![],
        },
        base_structure: BaseStructure {
            warmup: vec![segment(SegmentType::Warmup, 10.0, 50.0, 65.0)],
            main_set: vec![
                segment(SegmentType::Interval, 4.0, 106.0, 120.0),
                segment(SegmentType::Recovery, 4.0, 50.0, 60.0),
            ],
            cooldown: vec![segment(SegmentType::Cooldown, 10.0, 45.0, 55.0)],
        },
        variable_component: VariableComponent {
            kind: VariableKind::Sets,
            min: 3,
            max: 8,
            default: 5,
            step: 1,
            tss_per_unit: 10.53,
            duration_per_unit: 8.0,
        },
        base_duration_min: 60.0,
        base_tss: 62.3,
        progression: None,
        selection_weight: 1.0,
    }
}

/// 60 min steady endurance (30-150 min in steps of 5), 80 min / 49.4 TSS at default.
pub fn easy_endurance(id: &str) -> Workout {
    Workout {
        id: id.to_string(),
        name: format!("Endurance {id}"),
        description: "Steady aerobic riding".to_string(),
        workout_type: "endurance".to_string(),
        intensity: Intensity::Easy,
        suitable_phases: vec![Phase::Foundation, Phase::Build, Phase::Peak],
        suitable_weekdays: vec![],
        characteristics: Characteristics {
            fatigue_cost: Level::Low,
            technical_difficulty: Level::Low,
            equipment: vec![],
        },
        base_structure: BaseStructure {
            warmup: vec![segment(SegmentType::Warmup, 10.0, 50.0, 65.0)],
            main_set: vec![segment(SegmentType::SteadyState, 60.0, 58.0, 68.0)],
            cooldown: vec![segment(SegmentType::Cooldown, 10.0, 45.0, 55.0)],
        },
        variable_component: VariableComponent {
            kind: VariableKind::Duration,
            min: 30,
            max: 150,
            default: 60,
            step: 5,
            tss_per_unit: 0.66,
            duration_per_unit: 1.0,
        },
        base_duration_min: 80.0,
        base_tss: 49.4,
        progression: None,
        selection_weight: 1.0,
    }
}

/// A Foundation week.
pub fn week(
    week_number: u32,
    days: &[Weekday],
    hard_days: u32,
    easy_days: u32,
    target_tss: f64,
    total_hours: f64,
) -> WeekOverview {
    WeekOverview {
        week_number,
        phase: Phase::Foundation,
        training_days: days.to_vec(),
        hard_days,
        easy_days,
        target_tss,
        total_hours,
    }
}
