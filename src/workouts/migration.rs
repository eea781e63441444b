//! Catalog format migrations.
//!
//! A migration rewrites a whole catalog document from one schema version to
//! another before it is deserialized. Only directly registered version pairs
//! are applied; there is no chaining.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::library::LibraryError;

/// Rewrites a catalog document between two schema versions.
pub type MigrationFn = fn(Value) -> Result<Value, LibraryError>;

/// Registered migrations keyed by `(from, to)` version.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    migrations: HashMap<(String, String), MigrationFn>,
}

impl MigrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the migrations shipped with the crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("1.0", "2.0", migrate_v1_to_v2);
        registry
    }

    /// Register a migration for a version pair, replacing any existing one.
    pub fn register(&mut self, from: &str, to: &str, migration: MigrationFn) {
        self.migrations
            .insert((from.to_string(), to.to_string()), migration);
    }

    /// Apply the registered migration, or `None` if the pair is unknown.
    pub fn migrate(
        &self,
        document: Value,
        from: &str,
        to: &str,
    ) -> Option<Result<Value, LibraryError>> {
        let migration = self.migrations.get(&(from.to_string(), to.to_string()))?;
        Some(migration(document).map(|mut migrated| {
            if let Some(root) = migrated.as_object_mut() {
                root.insert("schema_version".to_string(), Value::String(to.to_string()));
            }
            migrated
        }))
    }
}

/// 1.0 catalogs kept the scalable part under `variable_components` with a
/// free-form `type` string and stored `fatigue` at the top level.
fn migrate_v1_to_v2(mut document: Value) -> Result<Value, LibraryError> {
    let Some(workouts) = document.get_mut("workouts").and_then(Value::as_array_mut) else {
        return Ok(document);
    };

    for workout in workouts.iter_mut() {
        let Some(entry) = workout.as_object_mut() else {
            continue;
        };
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        if let Some(Value::Object(mut legacy)) = entry.remove("variable_components") {
            let kind = legacy
                .remove("type")
                .and_then(|t| t.as_str().map(|s| s.trim().to_ascii_lowercase()));
            let kind = match kind.as_deref() {
                Some("sets") | Some("intervals") => "sets",
                Some("duration") | Some("time") => "duration",
                Some("both") => "both",
                other => {
                    return Err(LibraryError::SchemaError {
                        workout_id: id,
                        reason: format!("unknown variable component type {:?}", other),
                    })
                }
            };
            legacy.insert("kind".to_string(), Value::String(kind.to_string()));
            entry.insert("variable_component".to_string(), Value::Object(legacy));
        }

        if let Some(fatigue) = entry.remove("fatigue") {
            let characteristics = entry
                .entry("characteristics")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(characteristics) = characteristics.as_object_mut() {
                characteristics
                    .entry("fatigue_cost")
                    .or_insert(fatigue);
            }
        }
    }

    Ok(document)
}
