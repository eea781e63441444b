//! Workout template types and enums.
//!
//! A [`Workout`] is an immutable template from the library. The planning
//! engine never mutates a template in place; progression works on copies and
//! adjustment works on [`crate::planning::WorkoutAssignment`] values.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Macro period of a periodized plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[serde(alias = "Foundation", alias = "base", alias = "Base")]
    Foundation,
    #[serde(alias = "Build")]
    Build,
    #[serde(alias = "Peak")]
    Peak,
    #[serde(alias = "Recovery")]
    Recovery,
    #[serde(alias = "Taper")]
    Taper,
}

impl Phase {
    /// Phases tried, in order, when this phase has no eligible workouts.
    pub fn fallback_chain(&self) -> &'static [Phase] {
        match self {
            Phase::Foundation => &[Phase::Build, Phase::Recovery],
            Phase::Build => &[Phase::Foundation, Phase::Peak],
            Phase::Peak => &[Phase::Build, Phase::Taper],
            Phase::Taper => &[Phase::Peak, Phase::Recovery],
            Phase::Recovery => &[Phase::Foundation, Phase::Taper],
        }
    }

    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Foundation => "Foundation",
            Phase::Build => "Build",
            Phase::Peak => "Peak",
            Phase::Recovery => "Recovery",
            Phase::Taper => "Taper",
        }
    }

    /// Get all phases.
    pub fn all() -> Vec<Phase> {
        vec![
            Phase::Foundation,
            Phase::Build,
            Phase::Peak,
            Phase::Recovery,
            Phase::Taper,
        ]
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "foundation" | "base" => Ok(Phase::Foundation),
            "build" => Ok(Phase::Build),
            "peak" => Ok(Phase::Peak),
            "recovery" => Ok(Phase::Recovery),
            "taper" => Ok(Phase::Taper),
            other => Err(format!("Unknown phase: {}", other)),
        }
    }
}

/// Binary session classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Quality session at or above threshold
    Hard,
    /// Aerobic or recovery riding
    Easy,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intensity::Hard => write!(f, "hard"),
            Intensity::Easy => write!(f, "easy"),
        }
    }
}

/// Three-level rating used for fatigue cost and technical difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Low => write!(f, "low"),
            Level::Medium => write!(f, "medium"),
            Level::High => write!(f, "high"),
        }
    }
}

/// Physical demands of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristics {
    /// How much residual fatigue the session leaves
    pub fatigue_cost: Level,
    /// Execution difficulty
    pub technical_difficulty: Level,
    /// Required equipment
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// Type of workout segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Gradual power increase
    Warmup,
    /// Gradual power decrease
    Cooldown,
    /// Constant power
    SteadyState,
    /// Work interval inside a set
    Interval,
    /// Easy spinning between intervals
    Recovery,
    /// Linear power change
    Ramp,
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentType::Warmup => write!(f, "Warmup"),
            SegmentType::Cooldown => write!(f, "Cooldown"),
            SegmentType::SteadyState => write!(f, "Steady State"),
            SegmentType::Interval => write!(f, "Interval"),
            SegmentType::Recovery => write!(f, "Recovery"),
            SegmentType::Ramp => write!(f, "Ramp"),
        }
    }
}

/// A segment template with a power range in percent of FTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    /// Type of segment
    pub segment_type: SegmentType,
    /// Duration in minutes
    pub duration_min: f64,
    /// Lower power bound (% FTP)
    pub power_low: f64,
    /// Upper power bound (% FTP)
    pub power_high: f64,
    /// Coaching cue
    #[serde(default)]
    pub description: String,
}

impl SegmentTemplate {
    /// Midpoint of the power range as a fraction of FTP.
    pub fn intensity_factor(&self) -> f64 {
        (self.power_low + self.power_high) / 200.0
    }

    /// Training load of this segment on its own.
    pub fn tss(&self) -> f64 {
        tss_for(self.duration_min, self.intensity_factor())
    }
}

/// Warm-up / main-set / cool-down layout of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStructure {
    /// Segments ridden before the main set
    pub warmup: Vec<SegmentTemplate>,
    /// One set for set-based workouts, the whole main block otherwise
    pub main_set: Vec<SegmentTemplate>,
    /// Segments ridden after the main set
    pub cooldown: Vec<SegmentTemplate>,
}

impl BaseStructure {
    /// Total minutes of the main-set template.
    pub fn main_set_minutes(&self) -> f64 {
        self.main_set.iter().map(|s| s.duration_min).sum()
    }

    /// Total minutes of warm-up plus cool-down.
    pub fn fixed_minutes(&self) -> f64 {
        self.warmup
            .iter()
            .chain(self.cooldown.iter())
            .map(|s| s.duration_min)
            .sum()
    }

    /// Duration-weighted average main-set power as a fraction of FTP.
    pub fn main_set_intensity_factor(&self) -> f64 {
        let minutes = self.main_set_minutes();
        if minutes <= 0.0 {
            return 0.0;
        }
        self.main_set
            .iter()
            .map(|s| s.duration_min * s.intensity_factor())
            .sum::<f64>()
            / minutes
    }
}

/// Which part of a workout scales to hit weekly targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Whole interval sets are added or removed
    Sets,
    /// The main block is lengthened or shortened
    Duration,
    /// Set count scales, each set carrying its own duration
    Both,
}

impl VariableKind {
    /// Whether the adjuster treats this kind as a continuous duration knob.
    pub fn is_flexible(&self) -> bool {
        match self {
            VariableKind::Duration => true,
            VariableKind::Sets | VariableKind::Both => false,
        }
    }
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Sets => write!(f, "sets"),
            VariableKind::Duration => write!(f, "duration"),
            VariableKind::Both => write!(f, "both"),
        }
    }
}

/// Scalable component descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableComponent {
    /// What the value counts
    pub kind: VariableKind,
    /// Lowest allowed value
    pub min: u32,
    /// Highest allowed value
    pub max: u32,
    /// Value the base duration and load refer to
    pub default: u32,
    /// Granularity of adjustments, counted from `min`
    pub step: u32,
    /// Load added per unit (declared; derived for duration workouts)
    pub tss_per_unit: f64,
    /// Minutes added per unit
    pub duration_per_unit: f64,
}

impl VariableComponent {
    /// Clamp a value into `[min, max]`.
    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }

    /// Round a continuous value to the nearest `min + k*step`, then clamp.
    pub fn snap(&self, value: f64) -> u32 {
        let step = self.step.max(1) as f64;
        let min = self.min as f64;
        let steps = ((value - min) / step + 0.5).floor();
        let snapped = min + steps * step;
        if snapped <= min {
            self.min
        } else if snapped >= self.max as f64 {
            self.max
        } else {
            snapped as u32
        }
    }
}

/// Kind of progression a template declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionKind {
    /// Default set count grows
    IncreaseSets,
    /// Default main-block minutes grow
    IncreaseDuration,
    /// Default stays fixed
    None,
}

/// How the default value grows across a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRule {
    /// Which unit grows
    pub rule: ProgressionKind,
    /// Units added by the end of a phase
    #[serde(default)]
    pub increment: u32,
}

impl ProgressionRule {
    /// Whether this rule can act on the given variable kind.
    pub fn applies_to(&self, kind: VariableKind) -> bool {
        match (self.rule, kind) {
            (ProgressionKind::None, _) => true,
            (ProgressionKind::IncreaseSets, VariableKind::Sets | VariableKind::Both) => true,
            (ProgressionKind::IncreaseDuration, VariableKind::Duration | VariableKind::Both) => {
                true
            }
            _ => false,
        }
    }
}

fn default_selection_weight() -> f64 {
    1.0
}

/// A curated workout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Long description
    pub description: String,
    /// Free-form type tag ("endurance", "threshold", ...)
    pub workout_type: String,
    /// Hard or easy session
    pub intensity: Intensity,
    /// Training phases the template is written for
    pub suitable_phases: Vec<Phase>,
    /// Preferred weekdays; empty means any day
    #[serde(default)]
    pub suitable_weekdays: Vec<Weekday>,
    /// Fatigue cost and other session traits
    pub characteristics: Characteristics,
    /// Segment layout at one set or the default duration
    pub base_structure: BaseStructure,
    /// The part that scales with weekly targets
    pub variable_component: VariableComponent,
    /// Duration at the default variable value, in minutes
    pub base_duration_min: f64,
    /// Training load at the default variable value
    pub base_tss: f64,
    /// Growth of the default value across a phase
    #[serde(default)]
    pub progression: Option<ProgressionRule>,
    /// Base weight for rotation draws
    #[serde(default = "default_selection_weight")]
    pub selection_weight: f64,
}

impl Workout {
    /// Whether the template is suitable for the given phase.
    pub fn suits_phase(&self, phase: Phase) -> bool {
        self.suitable_phases.contains(&phase)
    }

    /// Whether the template prefers the given weekday.
    pub fn suits_weekday(&self, day: Weekday) -> bool {
        self.suitable_weekdays.is_empty() || self.suitable_weekdays.contains(&day)
    }

    /// Whether the session leaves a high fatigue cost.
    pub fn is_high_fatigue(&self) -> bool {
        self.characteristics.fatigue_cost == Level::High
    }

    /// Intensity factor of the main set.
    pub fn intensity_factor(&self) -> f64 {
        self.base_structure.main_set_intensity_factor()
    }

    /// Whether the variable component is a continuous duration.
    pub fn is_flexible(&self) -> bool {
        self.variable_component.kind.is_flexible()
    }

    /// Load added per unit of the variable component.
    ///
    /// Duration workouts derive it from the main-set intensity factor so that
    /// every load figure agrees with `duration_hours × IF² × 100`.
    pub fn load_per_unit(&self) -> f64 {
        let vc = &self.variable_component;
        match vc.kind {
            VariableKind::Duration => {
                tss_for(vc.duration_per_unit, self.intensity_factor())
            }
            VariableKind::Sets | VariableKind::Both => vc.tss_per_unit,
        }
    }

    /// Total duration in minutes at a variable value.
    pub fn duration_at(&self, value: u32) -> f64 {
        let vc = &self.variable_component;
        let delta = value as f64 - vc.default as f64;
        (self.base_duration_min + delta * vc.duration_per_unit).max(0.0)
    }

    /// Training load at a variable value.
    pub fn tss_at(&self, value: u32) -> f64 {
        let vc = &self.variable_component;
        let delta = value as f64 - vc.default as f64;
        (self.base_tss + delta * self.load_per_unit()).max(0.0)
    }

    /// Lowest load the template can be scaled to.
    pub fn min_tss(&self) -> f64 {
        self.tss_at(self.variable_component.min)
    }

    /// Highest load the template can be scaled to.
    pub fn max_tss(&self) -> f64 {
        self.tss_at(self.variable_component.max)
    }

    /// Duration of the expanded structure at a value, independent of the
    /// declared base figures.
    pub fn structure_minutes_at(&self, value: u32) -> f64 {
        let fixed = self.base_structure.fixed_minutes();
        match self.variable_component.kind {
            VariableKind::Sets | VariableKind::Both => {
                fixed + self.base_structure.main_set_minutes() * value as f64
            }
            VariableKind::Duration => {
                fixed + value as f64 * self.variable_component.duration_per_unit
            }
        }
    }
}

/// Training load for a block of `minutes` at intensity factor `if_`.
pub fn tss_for(minutes: f64, if_: f64) -> f64 {
    minutes / 60.0 * if_ * if_ * 100.0
}
