//! Training-plan assembly.
//!
//! Turns weekly overviews into scheduled, target-adjusted workouts drawn from
//! a [`crate::workouts::WorkoutLibrary`].

pub mod adjuster;
pub mod assignment;
pub mod error;
pub mod progression;
pub mod rotation;
pub mod scheduler;
pub mod selector;
pub mod validator;
pub mod week;

#[cfg(test)]
pub(crate) mod test_support;

pub use adjuster::{AdjustmentOutcome, DurationAdjuster};
pub use assignment::{RenderedSegment, RenderedWorkout, Segment, WorkoutAssignment};
pub use error::{
    InfeasibleTarget, PlanError, PlanWarning, SpacingConflict, SpacingReason, TargetMetric,
    ToleranceWarning,
};
pub use progression::{PhaseCalendar, PhaseSpan, ProgressiveOverloadPolicy};
pub use rotation::{RotationHistory, RotationStrategy, WeekSelections};
pub use scheduler::{PlacementScore, ScheduleOutcome, WeekdayScheduler};
pub use selector::{generate_plan, PlanReport, RenderedWeek, WeekReport, WorkoutSelector};
pub use validator::{
    PlanValidator, TargetStatus, ValidationIssue, ValidationReport, WeekTotals,
};
pub use week::WeekOverview;
