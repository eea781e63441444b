//! Workout templates and the curated library they are loaded from.

pub mod library;
pub mod migration;
pub mod types;

pub use library::{LibraryError, WorkoutLibrary, SCHEMA_VERSION};
pub use migration::{MigrationFn, MigrationRegistry};
pub use types::{
    BaseStructure, Characteristics, Intensity, Level, Phase, ProgressionKind, ProgressionRule,
    SegmentTemplate, SegmentType, VariableComponent, VariableKind, Workout,
};
