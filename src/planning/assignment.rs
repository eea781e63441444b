//! Scheduled sessions and their render-ready form.

use chrono::Weekday;
use serde::Serialize;

use crate::workouts::{Intensity, SegmentTemplate, SegmentType, VariableKind, Workout};

/// A concrete segment of an assigned session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub segment_type: SegmentType,
    pub duration_min: f64,
    /// Lower power bound (% FTP)
    pub power_low: f64,
    /// Upper power bound (% FTP)
    pub power_high: f64,
    pub description: String,
}

impl Segment {
    fn from_template(template: &SegmentTemplate, duration_min: f64, description: String) -> Self {
        Self {
            segment_type: template.segment_type,
            duration_min,
            power_low: template.power_low,
            power_high: template.power_high,
            description,
        }
    }
}

/// A workout placed on a weekday with its adjusted variable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutAssignment {
    pub weekday: Weekday,
    /// Source template (after progression)
    pub workout: Workout,
    /// Adjusted variable value
    pub value: u32,
    pub duration_min: f64,
    pub tss: f64,
    pub segments: Vec<Segment>,
}

impl WorkoutAssignment {
    /// Place a workout at its default variable value.
    pub fn new(weekday: Weekday, workout: Workout) -> Self {
        let value = workout.variable_component.default;
        let mut assignment = Self {
            weekday,
            workout,
            value,
            duration_min: 0.0,
            tss: 0.0,
            segments: Vec::new(),
        };
        assignment.set_value(value);
        assignment
    }

    /// Set the variable value (clamped to the template range) and recompute
    /// duration, load and segments.
    pub fn set_value(&mut self, value: u32) {
        self.value = self.workout.variable_component.clamp(value);
        self.duration_min = self.workout.duration_at(self.value);
        self.tss = self.workout.tss_at(self.value);
        self.segments = expand_segments(&self.workout, self.value);
    }

    pub fn is_hard(&self) -> bool {
        self.workout.intensity == Intensity::Hard
    }

    /// Render-ready record with absolute power targets for an FTP.
    pub fn render(&self, ftp: u16) -> RenderedWorkout {
        RenderedWorkout {
            weekday: self.weekday,
            workout_id: self.workout.id.clone(),
            name: self.workout.name.clone(),
            description: self.workout.description.clone(),
            total_duration_min: round1(self.duration_min),
            tss: round1(self.tss),
            segments: self
                .segments
                .iter()
                .map(|s| RenderedSegment {
                    segment_type: s.segment_type,
                    duration_min: round1(s.duration_min),
                    power_low: s.power_low,
                    power_high: s.power_high,
                    power_low_watts: watts(s.power_low, ftp),
                    power_high_watts: watts(s.power_high, ftp),
                    description: s.description.clone(),
                })
                .collect(),
        }
    }
}

/// Expand a template's structure at a variable value.
pub fn expand_segments(workout: &Workout, value: u32) -> Vec<Segment> {
    let structure = &workout.base_structure;
    let mut segments: Vec<Segment> = structure
        .warmup
        .iter()
        .map(|t| Segment::from_template(t, t.duration_min, t.description.clone()))
        .collect();

    match workout.variable_component.kind {
        VariableKind::Sets | VariableKind::Both => {
            for set in 1..=value {
                for t in &structure.main_set {
                    let description = if t.description.is_empty() {
                        format!("Set {}/{}", set, value)
                    } else {
                        format!("Set {}/{}: {}", set, value, t.description)
                    };
                    segments.push(Segment::from_template(t, t.duration_min, description));
                }
            }
        }
        VariableKind::Duration => {
            let main_minutes = structure.main_set_minutes();
            let scale = if main_minutes > 0.0 {
                value as f64 * workout.variable_component.duration_per_unit / main_minutes
            } else {
                0.0
            };
            segments.extend(
                structure
                    .main_set
                    .iter()
                    .map(|t| Segment::from_template(t, t.duration_min * scale, t.description.clone())),
            );
        }
    }

    segments.extend(
        structure
            .cooldown
            .iter()
            .map(|t| Segment::from_template(t, t.duration_min, t.description.clone())),
    );
    segments
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn watts(percent: f64, ftp: u16) -> u16 {
    (percent / 100.0 * ftp as f64).round() as u16
}

/// Output record consumed by report renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedWorkout {
    pub weekday: Weekday,
    pub workout_id: String,
    pub name: String,
    pub description: String,
    pub total_duration_min: f64,
    pub tss: f64,
    pub segments: Vec<RenderedSegment>,
}

/// One rendered segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSegment {
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub duration_min: f64,
    pub power_low: f64,
    pub power_high: f64,
    pub power_low_watts: u16,
    pub power_high_watts: u16,
    pub description: String,
}
