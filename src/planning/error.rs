//! Planning errors and warnings.
//!
//! Everything about the quality of a specific week is reported as data so a
//! multi-week plan can succeed partially. Only library load failures are
//! raised as errors outside this module.

use chrono::Weekday;
use serde::Serialize;
use thiserror::Error;

use super::validator::ValidationIssue;
use crate::workouts::{Intensity, Phase};

/// Which weekly target a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMetric {
    /// Training load (TSS)
    Load,
    /// Total duration in minutes
    Duration,
}

impl std::fmt::Display for TargetMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetMetric::Load => write!(f, "load"),
            TargetMetric::Duration => write!(f, "duration"),
        }
    }
}

/// A weekly target the available workouts cannot reach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfeasibleTarget {
    pub week_number: u32,
    pub metric: TargetMetric,
    pub target: f64,
    /// Best-effort value, absent when the week was rejected up front
    pub achieved: Option<f64>,
    pub min_achievable: f64,
    pub max_achievable: f64,
}

impl std::fmt::Display for InfeasibleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "week {} {} target {:.1} outside achievable range {:.1}-{:.1}",
            self.week_number, self.metric, self.target, self.min_achievable, self.max_achievable
        )?;
        if let Some(achieved) = self.achieved {
            write!(f, " (best effort {:.1})", achieved)?;
        }
        Ok(())
    }
}

/// Per-week planning errors.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanError {
    #[error("Infeasible target: {0}")]
    InfeasibleTarget(InfeasibleTarget),

    #[error("No eligible workouts for {phase} ({intensity:?}), tried {tried:?}")]
    SelectionError {
        phase: Phase,
        intensity: Option<Intensity>,
        tried: Vec<Phase>,
    },

    #[error("Invalid week: {0}")]
    InvalidWeek(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationIssue),
}

/// Why two sessions are too close together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingReason {
    /// Two hard sessions on consecutive days
    AdjacentHardDays,
    /// Two high-fatigue sessions inside the recovery gap
    HighFatigueTooClose,
}

/// One offending pair of sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingConflict {
    pub first_day: Weekday,
    pub first_workout: String,
    pub second_day: Weekday,
    pub second_workout: String,
    pub reason: SpacingReason,
}

impl std::fmt::Display for SpacingConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            SpacingReason::AdjacentHardDays => "hard sessions on adjacent days",
            SpacingReason::HighFatigueTooClose => "high-fatigue sessions too close",
        };
        write!(
            f,
            "{} ({}) / {} ({}): {}",
            self.first_workout, self.first_day, self.second_workout, self.second_day, reason
        )
    }
}

/// A weekly total outside tolerance but within twice the tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToleranceWarning {
    pub metric: TargetMetric,
    pub target: f64,
    pub achieved: f64,
    /// Relative deviation from target
    pub deviation: f64,
}

/// Non-fatal findings surfaced with a week's plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// Best placement still violates fatigue spacing
    WorkoutSpacing { conflicts: Vec<SpacingConflict> },
    /// A total landed between one and two tolerances from target
    TargetTolerance(ToleranceWarning),
    /// The phase pool was empty and a neighbouring phase was used
    FallbackUsed {
        intensity: Intensity,
        requested: Phase,
        used: Phase,
    },
    /// Non-fatal validation finding
    Validation(ValidationIssue),
}

impl std::fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanWarning::WorkoutSpacing { conflicts } => {
                write!(f, "Workout spacing: ")?;
                for (i, conflict) in conflicts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", conflict)?;
                }
                Ok(())
            }
            PlanWarning::TargetTolerance(w) => write!(
                f,
                "Target tolerance: {} {:.1} vs target {:.1} ({:.1}% off)",
                w.metric,
                w.achieved,
                w.target,
                w.deviation * 100.0
            ),
            PlanWarning::FallbackUsed {
                intensity,
                requested,
                used,
            } => write!(
                f,
                "No {} workouts for {}, used {} pool instead",
                intensity, requested, used
            ),
            PlanWarning::Validation(issue) => write!(f, "Validation: {}", issue),
        }
    }
}
