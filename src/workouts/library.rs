//! Curated workout library.
//!
//! The library is parsed and schema-validated once, up front, and is
//! immutable afterwards. A newer catalog format means a fresh load (with a
//! registered migration), never an in-place edit.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::migration::MigrationRegistry;
use super::types::{Intensity, Phase, Workout};
use crate::planning::validator::PlanValidator;

/// Catalog format version this build understands.
pub const SCHEMA_VERSION: &str = "2.0";

/// Built-in catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/workouts.json");

/// Immutable, validated catalog of workout templates.
#[derive(Debug, Clone)]
pub struct WorkoutLibrary {
    schema_version: String,
    workouts: Vec<Workout>,
    index: HashMap<String, usize>,
}

impl WorkoutLibrary {
    /// Parse and validate a catalog document at the current schema version.
    pub fn load(source: &str) -> Result<Self, LibraryError> {
        Self::load_with(source, SCHEMA_VERSION, &MigrationRegistry::with_defaults())
    }

    /// Parse a catalog, migrating it to `expected_version` when needed.
    pub fn load_with(
        source: &str,
        expected_version: &str,
        migrations: &MigrationRegistry,
    ) -> Result<Self, LibraryError> {
        let mut document: Value = serde_json::from_str(source)?;

        let found = document
            .get("schema_version")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LibraryError::SchemaError {
                workout_id: "<library>".to_string(),
                reason: "missing field `schema_version`".to_string(),
            })?;

        if found != expected_version {
            document = migrations
                .migrate(document, &found, expected_version)
                .ok_or_else(|| LibraryError::VersionError {
                    found: found.clone(),
                    expected: expected_version.to_string(),
                })??;
            tracing::info!(from = %found, to = %expected_version, "Migrated workout library");
        }

        let entries = match document.get_mut("workouts").map(Value::take) {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(LibraryError::SchemaError {
                    workout_id: "<library>".to_string(),
                    reason: "`workouts` must be an array".to_string(),
                })
            }
            None => {
                return Err(LibraryError::SchemaError {
                    workout_id: "<library>".to_string(),
                    reason: "missing field `workouts`".to_string(),
                })
            }
        };

        let mut workouts = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            let workout_id = entry
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", position));

            let workout: Workout =
                serde_json::from_value(entry).map_err(|e| LibraryError::SchemaError {
                    workout_id,
                    reason: e.to_string(),
                })?;
            workouts.push(workout);
        }

        let library = Self::from_workouts(workouts)?;
        let library = Self {
            schema_version: expected_version.to_string(),
            ..library
        };

        tracing::info!(
            workouts = library.len(),
            version = %library.schema_version,
            "Workout library loaded"
        );
        Ok(library)
    }

    /// Read and load a catalog file.
    pub fn load_file(path: &Path) -> Result<Self, LibraryError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LibraryError::IoError(e.to_string()))?;
        Self::load(&content)
    }

    /// Load the catalog bundled with the crate.
    pub fn builtin() -> Result<Self, LibraryError> {
        Self::load(BUILTIN_CATALOG)
    }

    /// Build a library from already-parsed templates, enforcing the schema
    /// invariants.
    pub fn from_workouts(workouts: Vec<Workout>) -> Result<Self, LibraryError> {
        let report = PlanValidator::default().validate_library(&workouts);
        if let Some(issue) = report.errors.into_iter().next() {
            return Err(LibraryError::SchemaError {
                workout_id: issue.workout_id().unwrap_or("<library>").to_string(),
                reason: issue.to_string(),
            });
        }
        for warning in &report.warnings {
            tracing::warn!(%warning, "Workout library consistency warning");
        }

        let index = workouts
            .iter()
            .enumerate()
            .map(|(position, workout)| (workout.id.clone(), position))
            .collect();

        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            workouts,
            index,
        })
    }

    /// Templates suitable for a phase with the given intensity, in catalog
    /// order. Empty when nothing matches.
    pub fn get_workouts_for_phase(&self, phase: Phase, intensity: Intensity) -> Vec<&Workout> {
        self.workouts
            .iter()
            .filter(|w| w.intensity == intensity && w.suits_phase(phase))
            .collect()
    }

    /// Get a template by identifier.
    pub fn get_by_id(&self, id: &str) -> Option<&Workout> {
        self.index.get(id).map(|&position| &self.workouts[position])
    }

    /// All templates in catalog order.
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    /// Schema version the library was loaded at.
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Get workout count.
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

/// Library load errors. These are the only planning errors raised as
/// exceptions rather than reported as data.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Library schema error in {workout_id}: {reason}")]
    SchemaError { workout_id: String, reason: String },

    #[error("Library version {found} is not supported (expected {expected}) and no migration is registered")]
    VersionError { found: String, expected: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
