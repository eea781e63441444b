//! RidePlan - Deterministic Training Plan Assembly
//!
//! Builds weekly cycling training schedules from a curated workout library.
//! Each week's workouts are chosen by recency-weighted rotation, progressed
//! through their phase, placed on training days with fatigue spacing, and
//! scaled so the week lands on its load and duration targets.

pub mod planning;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use planning::{generate_plan, PlanReport, WeekOverview, WeekReport, WorkoutSelector};
pub use storage::config::PlannerConfig;
pub use workouts::{Workout, WorkoutLibrary};
