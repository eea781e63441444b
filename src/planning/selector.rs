//! Week planning facade.
//!
//! [`WorkoutSelector::plan_week`] runs one week through feasibility check,
//! selection, progression, placement, adjustment and validation.
//! [`generate_plan`] threads a [`RotationHistory`] through a whole plan and
//! keeps going when a week fails.

use serde::Serialize;

use super::adjuster::DurationAdjuster;
use super::assignment::{RenderedWorkout, WorkoutAssignment};
use super::error::{InfeasibleTarget, PlanError, PlanWarning, TargetMetric};
use super::progression::{PhaseCalendar, ProgressiveOverloadPolicy};
use super::rotation::{RotationHistory, RotationStrategy};
use super::scheduler::WeekdayScheduler;
use super::validator::PlanValidator;
use super::week::WeekOverview;
use crate::storage::config::PlannerConfig;
use crate::workouts::{Intensity, Phase, Workout, WorkoutLibrary};

/// Outcome of planning one week.
#[derive(Debug, Clone, Serialize)]
pub struct WeekReport {
    pub week_number: u32,
    pub phase: Phase,
    /// Finalized sessions in Monday-first order; empty when the week failed
    pub assignments: Vec<WorkoutAssignment>,
    pub total_tss: f64,
    pub total_minutes: f64,
    pub errors: Vec<PlanError>,
    pub warnings: Vec<PlanWarning>,
}

impl WeekReport {
    /// Report for a week that could not be planned.
    pub fn failed(week: &WeekOverview, error: PlanError) -> Self {
        Self {
            week_number: week.week_number,
            phase: week.phase,
            assignments: Vec::new(),
            total_tss: 0.0,
            total_minutes: 0.0,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// True when the week has no errors.
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn render(&self, ftp: u16) -> RenderedWeek {
        RenderedWeek {
            week_number: self.week_number,
            phase: self.phase,
            total_tss: (self.total_tss * 10.0).round() / 10.0,
            total_duration_min: (self.total_minutes * 10.0).round() / 10.0,
            workouts: self.assignments.iter().map(|a| a.render(ftp)).collect(),
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
        }
    }
}

/// Render-ready week.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedWeek {
    pub week_number: u32,
    pub phase: Phase,
    pub total_tss: f64,
    pub total_duration_min: f64,
    pub workouts: Vec<RenderedWorkout>,
    pub errors: Vec<PlanError>,
    pub warnings: Vec<PlanWarning>,
}

/// Outcome of planning several weeks.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// Week reports in ascending week order
    pub weeks: Vec<WeekReport>,
    /// Rotation history after the last week
    pub history: RotationHistory,
}

impl PlanReport {
    /// True when every week was accepted.
    pub fn is_complete(&self) -> bool {
        self.weeks.iter().all(WeekReport::is_accepted)
    }

    /// Week numbers that carry errors.
    pub fn failed_weeks(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .filter(|w| !w.is_accepted())
            .map(|w| w.week_number)
            .collect()
    }

    pub fn render(&self, ftp: u16) -> Vec<RenderedWeek> {
        self.weeks.iter().map(|w| w.render(ftp)).collect()
    }
}

/// Plans weeks against one library with one configuration.
#[derive(Debug, Clone)]
pub struct WorkoutSelector<'a> {
    library: &'a WorkoutLibrary,
    rotation: RotationStrategy,
    progression: ProgressiveOverloadPolicy,
    scheduler: WeekdayScheduler,
    adjuster: DurationAdjuster,
    validator: PlanValidator,
    feasibility_margin: f64,
}

impl<'a> WorkoutSelector<'a> {
    pub fn new(library: &'a WorkoutLibrary, config: &PlannerConfig) -> Self {
        Self {
            library,
            rotation: RotationStrategy::new(config.rotation.clone()),
            progression: ProgressiveOverloadPolicy::new(),
            scheduler: WeekdayScheduler::new(&config.scheduling),
            adjuster: DurationAdjuster::new(&config.adjustment),
            validator: PlanValidator::new(config.adjustment.tolerance),
            feasibility_margin: config.feasibility.margin,
        }
    }

    /// Plan one week. Fatal conditions (malformed week, unreachable load
    /// target, no eligible workouts) are returned as `Err`; everything else
    /// is reported inside the [`WeekReport`].
    pub fn plan_week(
        &self,
        week: &WeekOverview,
        calendar: &PhaseCalendar,
        history: &mut RotationHistory,
    ) -> Result<WeekReport, PlanError> {
        week.validate_shape()?;

        let mut warnings = Vec::new();
        let mut pools = Vec::new();
        for (intensity, count) in [
            (Intensity::Hard, week.hard_days as usize),
            (Intensity::Easy, week.easy_days as usize),
        ] {
            if count == 0 {
                continue;
            }
            let (pool, fallback) = self.resolve_pool(week.phase, intensity)?;
            warnings.extend(fallback);
            pools.push((pool, count));
        }

        self.check_feasibility(week, &pools)?;

        history.begin_week(week.week_number);
        let mut chosen = Vec::with_capacity(week.session_count());
        for (pool, count) in &pools {
            for _ in 0..*count {
                let picked = history.current_week_ids();
                let fresh: Vec<&Workout> = pool
                    .iter()
                    .copied()
                    .filter(|w| !picked.contains(&w.id))
                    .collect();
                let candidates = if fresh.is_empty() { pool.clone() } else { fresh };

                let workout =
                    self.rotation
                        .select(&candidates, week.phase, week.week_number, history)?;
                chosen.push(
                    self.progression
                        .apply(workout, week.week_number, week.phase, calendar),
                );
            }
        }

        let schedule = self.scheduler.assign(chosen, &week.available_days());
        warnings.extend(schedule.warning);
        let mut assignments = schedule.assignments;

        let adjustment = self.adjuster.adjust(
            week.week_number,
            &mut assignments,
            week.target_tss,
            week.total_hours,
        );
        warnings.extend(adjustment.warnings);
        let mut errors: Vec<PlanError> = adjustment
            .infeasible
            .into_iter()
            .map(PlanError::InfeasibleTarget)
            .collect();

        let validation = self.validator.validate_assignments(week, &assignments);
        errors.extend(validation.errors.into_iter().map(PlanError::Validation));
        warnings.extend(validation.warnings.into_iter().map(PlanWarning::Validation));

        tracing::info!(
            week = week.week_number,
            phase = %week.phase,
            sessions = assignments.len(),
            total_tss = adjustment.total_tss,
            total_minutes = adjustment.total_minutes,
            errors = errors.len(),
            warnings = warnings.len(),
            "Week planned"
        );

        Ok(WeekReport {
            week_number: week.week_number,
            phase: week.phase,
            assignments,
            total_tss: adjustment.total_tss,
            total_minutes: adjustment.total_minutes,
            errors,
            warnings,
        })
    }

    /// Eligible workouts for a phase, walking the fallback chain when the
    /// phase itself has none.
    fn resolve_pool(
        &self,
        phase: Phase,
        intensity: Intensity,
    ) -> Result<(Vec<&'a Workout>, Option<PlanWarning>), PlanError> {
        let pool = self.library.get_workouts_for_phase(phase, intensity);
        if !pool.is_empty() {
            return Ok((pool, None));
        }

        let mut tried = vec![phase];
        for &fallback in phase.fallback_chain() {
            tried.push(fallback);
            let pool = self.library.get_workouts_for_phase(fallback, intensity);
            if !pool.is_empty() {
                tracing::warn!(
                    phase = %phase,
                    fallback = %fallback,
                    %intensity,
                    "Phase pool empty, using fallback"
                );
                return Ok((
                    pool,
                    Some(PlanWarning::FallbackUsed {
                        intensity,
                        requested: phase,
                        used: fallback,
                    }),
                ));
            }
        }

        Err(PlanError::SelectionError {
            phase,
            intensity: Some(intensity),
            tried,
        })
    }

    /// Reject load targets no selection from the pools could reach.
    fn check_feasibility(
        &self,
        week: &WeekOverview,
        pools: &[(Vec<&Workout>, usize)],
    ) -> Result<(), PlanError> {
        let (min_load, max_load) = achievable_load(pools);
        let low = min_load * (1.0 - self.feasibility_margin);
        let high = max_load * (1.0 + self.feasibility_margin);

        if week.target_tss < low || week.target_tss > high {
            let report = InfeasibleTarget {
                week_number: week.week_number,
                metric: TargetMetric::Load,
                target: week.target_tss,
                achieved: None,
                min_achievable: min_load,
                max_achievable: max_load,
            };
            tracing::warn!(%report, "Week rejected by feasibility check");
            return Err(PlanError::InfeasibleTarget(report));
        }
        Ok(())
    }
}

/// Lowest and highest total load for `count` sessions from each pool.
///
/// Picks the lightest (heaviest) templates first and reuses them once a pool
/// runs out.
pub fn achievable_load(pools: &[(Vec<&Workout>, usize)]) -> (f64, f64) {
    let mut min_total = 0.0;
    let mut max_total = 0.0;
    for (pool, count) in pools {
        if pool.is_empty() {
            continue;
        }
        let mut lows: Vec<f64> = pool.iter().map(|w| w.min_tss()).collect();
        let mut highs: Vec<f64> = pool.iter().map(|w| w.max_tss()).collect();
        lows.sort_by(f64::total_cmp);
        highs.sort_by(|a, b| b.total_cmp(a));

        min_total += (0..*count).map(|i| lows[i % lows.len()]).sum::<f64>();
        max_total += (0..*count).map(|i| highs[i % highs.len()]).sum::<f64>();
    }
    (min_total, max_total)
}

/// Plan every week in ascending week order.
///
/// A week that fails becomes a report carrying its error; later weeks are
/// still planned.
pub fn generate_plan(
    library: &WorkoutLibrary,
    config: &PlannerConfig,
    weeks: &[WeekOverview],
) -> PlanReport {
    let mut ordered = weeks.to_vec();
    ordered.sort_by_key(|w| w.week_number);

    let calendar = PhaseCalendar::from_weeks(&ordered);
    tracing::info!(
        weeks = calendar.total_weeks(),
        phase_blocks = calendar.spans().len(),
        "Generating plan"
    );
    let selector = WorkoutSelector::new(library, config);
    let mut history = RotationHistory::new(config.rotation.window_weeks);

    let reports = ordered
        .iter()
        .map(|week| match selector.plan_week(week, &calendar, &mut history) {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(week = week.week_number, %error, "Week failed");
                WeekReport::failed(week, error)
            }
        })
        .collect();

    PlanReport {
        weeks: reports,
        history,
    }
}
