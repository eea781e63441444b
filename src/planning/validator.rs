//! Multi-level plan validation.
//!
//! Three independent checks (library schema, week assignment shape, weekly
//! targets), each returning errors and warnings as data.

use std::collections::HashSet;

use chrono::Weekday;
use serde::Serialize;
use thiserror::Error;

use super::assignment::WorkoutAssignment;
use super::error::TargetMetric;
use super::week::WeekOverview;
use crate::workouts::{Intensity, ProgressionKind, VariableKind, Workout};

/// Allowed gap between declared and expanded base duration, in minutes.
const STRUCTURE_SLACK_MIN: f64 = 1.0;

/// Allowed relative gap between declared and derived load per unit.
const LOAD_PER_UNIT_SLACK: f64 = 0.10;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("{workout_id}: missing required field `{field}`")]
    MissingField { workout_id: String, field: String },

    #[error("{workout_id}: variable range must satisfy min <= default <= max (got {min} <= {default} <= {max})")]
    InvalidRange {
        workout_id: String,
        min: u32,
        default: u32,
        max: u32,
    },

    #[error("{workout_id}: {reason}")]
    InvalidValue { workout_id: String, reason: String },

    #[error("{workout_id}: duplicate workout id")]
    DuplicateId { workout_id: String },

    #[error("{workout_id}: progression {rule:?} cannot act on {kind} workouts")]
    ProgressionMismatch {
        workout_id: String,
        rule: ProgressionKind,
        kind: VariableKind,
    },

    #[error("{workout_id}: base duration {declared:.1} min disagrees with structure {expanded:.1} min")]
    StructureMismatch {
        workout_id: String,
        declared: f64,
        expanded: f64,
    },

    #[error("{workout_id}: declared load per unit {declared:.3} disagrees with derived {derived:.3}")]
    LoadPerUnitMismatch {
        workout_id: String,
        declared: f64,
        derived: f64,
    },

    #[error("expected {expected} sessions, found {actual}")]
    AssignmentCount { expected: usize, actual: usize },

    #[error("expected {expected} {intensity} sessions, found {actual}")]
    IntensityCount {
        intensity: Intensity,
        expected: usize,
        actual: usize,
    },

    #[error("{weekday} is not an available training day")]
    UnavailableWeekday { weekday: Weekday },

    #[error("{weekday} has more than one session")]
    DuplicateWeekday { weekday: Weekday },

    #[error("{metric} {achieved:.1} deviates {deviation:.3} from target {target:.1}")]
    TargetDeviation {
        metric: TargetMetric,
        target: f64,
        achieved: f64,
        deviation: f64,
    },
}

impl ValidationIssue {
    /// The workout the issue is about, for schema issues.
    pub fn workout_id(&self) -> Option<&str> {
        match self {
            ValidationIssue::MissingField { workout_id, .. }
            | ValidationIssue::InvalidRange { workout_id, .. }
            | ValidationIssue::InvalidValue { workout_id, .. }
            | ValidationIssue::DuplicateId { workout_id }
            | ValidationIssue::ProgressionMismatch { workout_id, .. }
            | ValidationIssue::StructureMismatch { workout_id, .. }
            | ValidationIssue::LoadPerUnitMismatch { workout_id, .. } => Some(workout_id),
            _ => None,
        }
    }
}

/// Errors (fatal) and warnings (non-fatal) from one check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append another report's findings.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Weekly load and minutes, either targeted or achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeekTotals {
    pub tss: f64,
    pub minutes: f64,
}

impl WeekTotals {
    /// Targets of a week overview.
    pub fn targets(week: &WeekOverview) -> Self {
        Self {
            tss: week.target_tss,
            minutes: week.target_minutes(),
        }
    }
}

/// Where an achieved total sits relative to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetStatus {
    /// Within tolerance
    Within,
    /// Outside tolerance, within twice the tolerance
    Tolerated(f64),
    /// Beyond twice the tolerance
    Exceeded(f64),
}

/// Plan validator.
#[derive(Debug, Clone)]
pub struct PlanValidator {
    tolerance: f64,
}

impl Default for PlanValidator {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl PlanValidator {
    /// Create a validator with a relative target tolerance.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Schema check over a set of templates.
    pub fn validate_library(&self, workouts: &[Workout]) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut seen = HashSet::new();

        for workout in workouts {
            if !workout.id.is_empty() && !seen.insert(workout.id.as_str()) {
                report.errors.push(ValidationIssue::DuplicateId {
                    workout_id: workout.id.clone(),
                });
            }
            report.merge(self.validate_workout(workout));
        }

        report
    }

    /// Schema check for one template.
    pub fn validate_workout(&self, workout: &Workout) -> ValidationReport {
        let mut report = ValidationReport::default();
        let id = if workout.id.is_empty() {
            "<unnamed>".to_string()
        } else {
            workout.id.clone()
        };
        let missing = |field: &str| ValidationIssue::MissingField {
            workout_id: id.clone(),
            field: field.to_string(),
        };
        let invalid = |reason: String| ValidationIssue::InvalidValue {
            workout_id: id.clone(),
            reason,
        };

        if workout.id.trim().is_empty() {
            report.errors.push(missing("id"));
        }
        if workout.name.trim().is_empty() {
            report.errors.push(missing("name"));
        }
        if workout.suitable_phases.is_empty() {
            report.errors.push(missing("suitable_phases"));
        }
        if workout.base_structure.main_set.is_empty() {
            report.errors.push(missing("base_structure.main_set"));
        }

        let vc = &workout.variable_component;
        if !(vc.min <= vc.default && vc.default <= vc.max) {
            report.errors.push(ValidationIssue::InvalidRange {
                workout_id: id.clone(),
                min: vc.min,
                default: vc.default,
                max: vc.max,
            });
        }
        if vc.step == 0 {
            report
                .errors
                .push(invalid("variable step must be positive".to_string()));
        }
        if !(vc.duration_per_unit.is_finite() && vc.duration_per_unit > 0.0) {
            report
                .errors
                .push(invalid("duration_per_unit must be positive".to_string()));
        }
        if !(vc.tss_per_unit.is_finite() && vc.tss_per_unit >= 0.0) {
            report
                .errors
                .push(invalid("tss_per_unit must be non-negative".to_string()));
        }
        if !(workout.base_duration_min.is_finite() && workout.base_duration_min > 0.0) {
            report
                .errors
                .push(invalid("base_duration_min must be positive".to_string()));
        }
        if !(workout.base_tss.is_finite() && workout.base_tss >= 0.0) {
            report
                .errors
                .push(invalid("base_tss must be non-negative".to_string()));
        }
        if !(workout.selection_weight.is_finite() && workout.selection_weight >= 0.0) {
            report
                .errors
                .push(invalid("selection_weight must be non-negative".to_string()));
        }

        let segments = workout
            .base_structure
            .warmup
            .iter()
            .chain(&workout.base_structure.main_set)
            .chain(&workout.base_structure.cooldown);
        for segment in segments {
            if segment.duration_min <= 0.0 || segment.power_low > segment.power_high {
                report.errors.push(invalid(format!(
                    "segment {} has invalid duration or power range",
                    segment.segment_type
                )));
            }
        }

        if let Some(progression) = &workout.progression {
            if !progression.applies_to(vc.kind) {
                report.errors.push(ValidationIssue::ProgressionMismatch {
                    workout_id: id.clone(),
                    rule: progression.rule,
                    kind: vc.kind,
                });
            }
        }

        if report.is_valid() {
            let expanded = workout.structure_minutes_at(vc.default);
            if (expanded - workout.base_duration_min).abs() > STRUCTURE_SLACK_MIN {
                report.warnings.push(ValidationIssue::StructureMismatch {
                    workout_id: id.clone(),
                    declared: workout.base_duration_min,
                    expanded,
                });
            }

            if vc.kind == VariableKind::Duration {
                let derived = workout.load_per_unit();
                if derived > 0.0 && ((vc.tss_per_unit - derived) / derived).abs() > LOAD_PER_UNIT_SLACK
                {
                    report.warnings.push(ValidationIssue::LoadPerUnitMismatch {
                        workout_id: id,
                        declared: vc.tss_per_unit,
                        derived,
                    });
                }
            }
        }

        report
    }

    /// Shape check for one week's assignments.
    pub fn validate_assignments(
        &self,
        week: &WeekOverview,
        assignments: &[WorkoutAssignment],
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        let expected = week.session_count();
        if assignments.len() != expected {
            report.errors.push(ValidationIssue::AssignmentCount {
                expected,
                actual: assignments.len(),
            });
        }

        for (intensity, expected) in [
            (Intensity::Hard, week.hard_days as usize),
            (Intensity::Easy, week.easy_days as usize),
        ] {
            let actual = assignments
                .iter()
                .filter(|a| a.workout.intensity == intensity)
                .count();
            if actual != expected {
                report.errors.push(ValidationIssue::IntensityCount {
                    intensity,
                    expected,
                    actual,
                });
            }
        }

        let mut used = HashSet::new();
        for assignment in assignments {
            if !week.training_days.contains(&assignment.weekday) {
                report.errors.push(ValidationIssue::UnavailableWeekday {
                    weekday: assignment.weekday,
                });
            }
            if !used.insert(assignment.weekday) {
                report.errors.push(ValidationIssue::DuplicateWeekday {
                    weekday: assignment.weekday,
                });
            }
        }

        report
    }

    /// Target check for one week's totals. Deviations up to twice the
    /// tolerance are warnings, larger ones errors.
    pub fn validate_targets(&self, target: WeekTotals, achieved: WeekTotals) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (metric, target, achieved) in [
            (TargetMetric::Load, target.tss, achieved.tss),
            (TargetMetric::Duration, target.minutes, achieved.minutes),
        ] {
            let issue = |deviation| ValidationIssue::TargetDeviation {
                metric,
                target,
                achieved,
                deviation,
            };
            match self.classify(target, achieved) {
                TargetStatus::Within => {}
                TargetStatus::Tolerated(deviation) => report.warnings.push(issue(deviation)),
                TargetStatus::Exceeded(deviation) => report.errors.push(issue(deviation)),
            }
        }

        report
    }

    /// Classify an achieved total against its target.
    pub fn classify(&self, target: f64, achieved: f64) -> TargetStatus {
        if target <= 0.0 {
            return TargetStatus::Within;
        }
        let deviation = (achieved - target).abs() / target;
        if deviation <= self.tolerance {
            TargetStatus::Within
        } else if deviation <= self.tolerance * 2.0 {
            TargetStatus::Tolerated(deviation)
        } else {
            TargetStatus::Exceeded(deviation)
        }
    }
}
