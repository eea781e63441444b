//! Planner configuration.
//!
//! Loaded from `config.toml` in the application data directory. Every
//! heuristic constant the engine uses lives here with its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::workouts::SCHEMA_VERSION;

/// Athlete physiology used for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteSettings {
    /// Functional Threshold Power in watts (50-600)
    pub ftp: u16,
}

impl Default for AthleteSettings {
    fn default() -> Self {
        Self { ftp: 250 }
    }
}

impl AthleteSettings {
    /// Validate FTP value (50-600 watts).
    pub fn validate_ftp(ftp: u16) -> bool {
        (50..=600).contains(&ftp)
    }
}

/// Where the workout catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Catalog file; the built-in catalog is used when unset
    pub path: Option<PathBuf>,
    /// Schema version the engine expects
    pub expected_version: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            path: None,
            expected_version: SCHEMA_VERSION.to_string(),
        }
    }
}

/// Workout rotation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Trailing weeks of history that penalize reuse
    pub window_weeks: usize,
    /// Weight multiplier per recent use (weight × decay^uses)
    pub recency_decay: f64,
    /// Weight for candidates borrowed from a fallback phase
    pub fallback_phase_weight: f64,
    /// Only draw among the least recently used candidates
    pub strict_variety: bool,
    /// Plan seed for reproducible draws
    pub seed: u64,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            window_weeks: 3,
            recency_decay: 0.5,
            fallback_phase_weight: 0.5,
            strict_variety: true,
            seed: 42,
        }
    }
}

/// Weekly target adjustment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSettings {
    /// Accepted relative deviation from targets
    pub tolerance: f64,
    /// Weight of the load-implied duration in the flexible blend
    pub load_blend_weight: f64,
    /// Weight of the duration-implied duration in the flexible blend
    pub duration_blend_weight: f64,
}

impl Default for AdjustmentSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            load_blend_weight: 0.7,
            duration_blend_weight: 0.3,
        }
    }
}

/// Weekday placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingSettings {
    /// Workouts longer than this prefer the weekend
    pub long_ride_threshold_min: f64,
    /// High-fatigue sessions this many days apart or closer are penalized
    pub high_fatigue_gap_days: u32,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            long_ride_threshold_min: 90.0,
            high_fatigue_gap_days: 2,
        }
    }
}

/// Feasibility pre-check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilitySettings {
    /// Slack around the achievable load range
    pub margin: f64,
}

impl Default for FeasibilitySettings {
    fn default() -> Self {
        Self { margin: 0.05 }
    }
}

/// Planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub athlete: AthleteSettings,
    pub library: LibrarySettings,
    pub rotation: RotationSettings,
    pub adjustment: AdjustmentSettings,
    pub scheduling: SchedulingSettings,
    pub feasibility: FeasibilitySettings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            athlete: AthleteSettings::default(),
            library: LibrarySettings::default(),
            rotation: RotationSettings::default(),
            adjustment: AdjustmentSettings::default(),
            scheduling: SchedulingSettings::default(),
            feasibility: FeasibilitySettings::default(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rideplan", "RidePlan")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<PlannerConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file, falling back to defaults when it is absent.
pub fn load_config_from(path: &Path) -> Result<PlannerConfig, ConfigError> {
    if !path.exists() {
        let config = PlannerConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: PlannerConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(get_data_dir);

    if !AthleteSettings::validate_ftp(config.athlete.ftp) {
        return Err(ConfigError::ParseError(format!(
            "athlete.ftp {} is outside 50-600 W",
            config.athlete.ftp
        )));
    }

    Ok(config)
}

/// Save configuration to a file.
pub fn save_config(config: &PlannerConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
