//! Weekly target adjustment.
//!
//! Three passes over an already placed week:
//!
//! - **Phase A** spreads the load and duration gaps evenly over duration
//!   workouts, blending the duration implied by the load gap with the one
//!   implied by the duration gap.
//! - **Phase B** closes the remaining load gap with whole sets, largest
//!   units first. If the load is still outside tolerance, duration workouts
//!   are then stepped toward the load target until it is back inside.
//! - **Phase C** classifies the totals against the targets and reports
//!   tolerance warnings or infeasible targets as data.
//!
//! Power is expressed in percent of FTP throughout, so the athlete's FTP
//! cancels out of every load figure here.

use super::assignment::WorkoutAssignment;
use super::error::{InfeasibleTarget, PlanWarning, TargetMetric, ToleranceWarning};
use super::validator::{PlanValidator, ValidationIssue, WeekTotals};
use crate::storage::config::AdjustmentSettings;

/// Upper bound on unit moves per discrete assignment.
const MAX_UNIT_MOVES: usize = 64;

/// Totals and findings after adjustment.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentOutcome {
    pub total_tss: f64,
    pub total_minutes: f64,
    pub warnings: Vec<PlanWarning>,
    /// Targets that ended beyond twice the tolerance
    pub infeasible: Vec<InfeasibleTarget>,
}

/// Scales variable components to meet weekly targets.
#[derive(Debug, Clone)]
pub struct DurationAdjuster {
    validator: PlanValidator,
    load_blend_weight: f64,
    duration_blend_weight: f64,
}

impl Default for DurationAdjuster {
    fn default() -> Self {
        Self::new(&AdjustmentSettings::default())
    }
}

impl DurationAdjuster {
    pub fn new(settings: &AdjustmentSettings) -> Self {
        Self {
            validator: PlanValidator::new(settings.tolerance),
            load_blend_weight: settings.load_blend_weight,
            duration_blend_weight: settings.duration_blend_weight,
        }
    }

    /// Adjust a week's assignments in place.
    pub fn adjust(
        &self,
        week_number: u32,
        assignments: &mut [WorkoutAssignment],
        target_tss: f64,
        target_hours: f64,
    ) -> AdjustmentOutcome {
        let target_minutes = target_hours * 60.0;

        self.adjust_flexible(assignments, target_tss, target_minutes);
        self.adjust_discrete(assignments, target_tss);
        self.trim_flexible(assignments, target_tss);

        let (total_tss, total_minutes) = totals(assignments);
        tracing::debug!(
            week = week_number,
            total_tss,
            total_minutes,
            target_tss,
            target_minutes,
            "Adjustment finished"
        );

        let mut outcome = AdjustmentOutcome {
            total_tss,
            total_minutes,
            ..Default::default()
        };

        let load_bounds = bounds(assignments, |a, v| a.workout.tss_at(v));
        let minute_bounds = bounds(assignments, |a, v| a.workout.duration_at(v));

        let report = self.validator.validate_targets(
            WeekTotals {
                tss: target_tss,
                minutes: target_minutes,
            },
            WeekTotals {
                tss: total_tss,
                minutes: total_minutes,
            },
        );

        for issue in report.warnings {
            let ValidationIssue::TargetDeviation {
                metric,
                target,
                achieved,
                deviation,
            } = issue
            else {
                continue;
            };
            tracing::warn!(
                week = week_number,
                %metric,
                target,
                achieved,
                deviation,
                "Target outside tolerance"
            );
            outcome
                .warnings
                .push(PlanWarning::TargetTolerance(ToleranceWarning {
                    metric,
                    target,
                    achieved,
                    deviation,
                }));
        }

        for issue in report.errors {
            let ValidationIssue::TargetDeviation {
                metric,
                target,
                achieved,
                ..
            } = issue
            else {
                continue;
            };
            let (min_achievable, max_achievable) = match metric {
                TargetMetric::Load => load_bounds,
                TargetMetric::Duration => minute_bounds,
            };
            let infeasible = InfeasibleTarget {
                week_number,
                metric,
                target,
                achieved: Some(achieved),
                min_achievable,
                max_achievable,
            };
            tracing::warn!(report = %infeasible, "Infeasible target");
            outcome.infeasible.push(infeasible);
        }

        outcome
    }

    /// Phase A: duration workouts.
    fn adjust_flexible(
        &self,
        assignments: &mut [WorkoutAssignment],
        target_tss: f64,
        target_minutes: f64,
    ) {
        let flexible: Vec<usize> = (0..assignments.len())
            .filter(|&i| assignments[i].workout.is_flexible())
            .collect();
        if flexible.is_empty() {
            return;
        }

        let (total_tss, total_minutes) = totals(assignments);
        let count = flexible.len() as f64;
        let load_share = (target_tss - total_tss) / count;
        let minute_share = (target_minutes - total_minutes) / count;

        let (load_weight, duration_weight) = self.blend_weights();

        for i in flexible {
            let assignment = &mut assignments[i];
            let current = assignment.duration_min;
            let intensity = assignment.workout.intensity_factor();

            let load_implied = if intensity > 0.0 {
                current + load_share / (intensity * intensity * 100.0) * 60.0
            } else {
                current
            };
            let duration_implied = current + minute_share;
            let blended = load_weight * load_implied + duration_weight * duration_implied;

            let vc = &assignment.workout.variable_component;
            let raw = assignment.value as f64 + (blended - current) / vc.duration_per_unit;
            let value = vc.snap(raw);

            tracing::debug!(
                workout = %assignment.workout.id,
                load_implied,
                duration_implied,
                from = assignment.value,
                to = value,
                "Flexible adjustment"
            );
            assignment.set_value(value);
        }
    }

    /// Phase B: set-based workouts, one unit at a time.
    fn adjust_discrete(&self, assignments: &mut [WorkoutAssignment], target_tss: f64) {
        let discrete = by_unit_load(assignments, |a| !a.workout.is_flexible());
        let (total_tss, _) = totals(assignments);
        let mut gap = target_tss - total_tss;

        for i in discrete {
            step_toward(&mut assignments[i], &mut gap, 0.0, "Discrete adjustment");
        }
    }

    /// Load trim: while the week's load is outside tolerance, duration
    /// workouts give up part of the duration blend. Skipped when the blend
    /// carries no load weight.
    fn trim_flexible(&self, assignments: &mut [WorkoutAssignment], target_tss: f64) {
        if self.blend_weights().0 <= 0.0 {
            return;
        }
        let slack = self.validator.tolerance() * target_tss.abs();
        let flexible = by_unit_load(assignments, |a| a.workout.is_flexible());
        let (total_tss, _) = totals(assignments);
        let mut gap = target_tss - total_tss;

        for i in flexible {
            if gap.abs() <= slack {
                break;
            }
            step_toward(&mut assignments[i], &mut gap, slack, "Load trim");
        }
    }

    /// Load and duration blend weights, normalised to sum to one.
    fn blend_weights(&self) -> (f64, f64) {
        let weight_sum = self.load_blend_weight + self.duration_blend_weight;
        if weight_sum > 0.0 {
            (
                self.load_blend_weight / weight_sum,
                self.duration_blend_weight / weight_sum,
            )
        } else {
            (1.0, 0.0)
        }
    }
}

/// Indices of the matching assignments, largest load step first.
fn by_unit_load<F>(assignments: &[WorkoutAssignment], filter: F) -> Vec<usize>
where
    F: Fn(&WorkoutAssignment) -> bool,
{
    let mut indices: Vec<usize> = (0..assignments.len())
        .filter(|&i| filter(&assignments[i]))
        .collect();
    indices.sort_by(|&a, &b| unit_load(&assignments[b]).total_cmp(&unit_load(&assignments[a])));
    indices
}

/// Move one assignment a step at a time while each move shrinks the load gap
/// and the gap is larger than `slack`.
fn step_toward(assignment: &mut WorkoutAssignment, gap: &mut f64, slack: f64, label: &str) {
    let unit = unit_load(assignment);
    let vc = &assignment.workout.variable_component;
    let (min, max, step) = (vc.min, vc.max, vc.step);
    if unit <= 0.0 || step == 0 {
        return;
    }

    let start = assignment.value;
    let mut value = start;
    for _ in 0..MAX_UNIT_MOVES {
        if gap.abs() <= slack {
            break;
        }
        if *gap > 0.0 && value + step <= max && (*gap - unit).abs() < gap.abs() {
            value += step;
            *gap -= unit;
        } else if *gap < 0.0 && value >= min + step && (*gap + unit).abs() < gap.abs() {
            value -= step;
            *gap += unit;
        } else {
            break;
        }
    }

    if value != start {
        tracing::debug!(
            workout = %assignment.workout.id,
            from = start,
            to = value,
            "{}",
            label
        );
        assignment.set_value(value);
    }
}

fn unit_load(assignment: &WorkoutAssignment) -> f64 {
    assignment.workout.load_per_unit() * assignment.workout.variable_component.step as f64
}

/// Week totals of load and minutes.
pub fn totals(assignments: &[WorkoutAssignment]) -> (f64, f64) {
    assignments.iter().fold((0.0, 0.0), |(tss, minutes), a| {
        (tss + a.tss, minutes + a.duration_min)
    })
}

/// Lowest and highest week total of a per-assignment figure.
fn bounds<F>(assignments: &[WorkoutAssignment], figure: F) -> (f64, f64)
where
    F: Fn(&WorkoutAssignment, u32) -> f64,
{
    assignments.iter().fold((0.0, 0.0), |(low, high), a| {
        let vc = &a.workout.variable_component;
        (low + figure(a, vc.min), high + figure(a, vc.max))
    })
}
