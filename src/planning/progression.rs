//! Progressive overload across a phase.
//!
//! A template's default value grows linearly from the first to the last week
//! of each contiguous run of same-phase weeks. The result is a modified copy;
//! library templates are never touched.

use serde::Serialize;

use super::week::WeekOverview;
use crate::workouts::{Phase, ProgressionKind, Workout};

/// A contiguous run of weeks sharing one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseSpan {
    pub phase: Phase,
    pub start_week: u32,
    pub end_week: u32,
}

impl PhaseSpan {
    /// Position of a week within the span, 0.0 at the start and 1.0 at the end.
    pub fn progress(&self, week_number: u32) -> f64 {
        if self.end_week <= self.start_week
            || week_number < self.start_week
            || week_number > self.end_week
        {
            return 0.0;
        }
        (week_number - self.start_week) as f64 / (self.end_week - self.start_week) as f64
    }

    pub fn contains(&self, week_number: u32) -> bool {
        (self.start_week..=self.end_week).contains(&week_number)
    }
}

/// Phase spans for a whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseCalendar {
    spans: Vec<PhaseSpan>,
}

impl PhaseCalendar {
    /// Group weeks into spans. Weeks are sorted by number first; a phase
    /// change or a gap in numbering starts a new span.
    pub fn from_weeks(weeks: &[WeekOverview]) -> Self {
        let mut ordered: Vec<(u32, Phase)> =
            weeks.iter().map(|w| (w.week_number, w.phase)).collect();
        ordered.sort_by_key(|(number, _)| *number);
        ordered.dedup_by_key(|(number, _)| *number);

        let mut spans: Vec<PhaseSpan> = Vec::new();
        for (number, phase) in ordered {
            match spans.last_mut() {
                Some(span) if span.phase == phase && span.end_week + 1 == number => {
                    span.end_week = number;
                }
                _ => spans.push(PhaseSpan {
                    phase,
                    start_week: number,
                    end_week: number,
                }),
            }
        }

        Self { spans }
    }

    /// The span containing a week.
    pub fn span_for(&self, week_number: u32) -> Option<&PhaseSpan> {
        self.spans.iter().find(|s| s.contains(week_number))
    }

    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }

    pub fn total_weeks(&self) -> u32 {
        self.spans
            .iter()
            .map(|s| s.end_week - s.start_week + 1)
            .sum()
    }
}

/// Applies a template's progression rule for a given week.
#[derive(Debug, Clone, Default)]
pub struct ProgressiveOverloadPolicy;

impl ProgressiveOverloadPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Progress through the phase for a week; 0.0 when the calendar does not
    /// place the week in `phase`.
    pub fn progress_fraction(&self, week_number: u32, phase: Phase, calendar: &PhaseCalendar) -> f64 {
        match calendar.span_for(week_number) {
            Some(span) if span.phase == phase => span.progress(week_number),
            _ => 0.0,
        }
    }

    /// Copy of the template with its default value (and the matching base
    /// duration and load) progressed for the week.
    pub fn apply(
        &self,
        workout: &Workout,
        week_number: u32,
        phase: Phase,
        calendar: &PhaseCalendar,
    ) -> Workout {
        let mut progressed = workout.clone();
        let Some(rule) = &workout.progression else {
            return progressed;
        };
        if rule.rule == ProgressionKind::None
            || rule.increment == 0
            || !rule.applies_to(workout.variable_component.kind)
        {
            return progressed;
        }

        let fraction = self.progress_fraction(week_number, phase, calendar);
        let added = (fraction * rule.increment as f64).round() as u32;
        if added == 0 {
            return progressed;
        }

        let vc = &workout.variable_component;
        let new_default = vc.clamp(vc.default.saturating_add(added));
        let delta = new_default as f64 - vc.default as f64;

        progressed.variable_component.default = new_default;
        progressed.base_duration_min = workout.duration_at(new_default);
        progressed.base_tss = workout.tss_at(new_default);

        tracing::debug!(
            week = week_number,
            workout = %workout.id,
            from = vc.default,
            to = new_default,
            delta,
            "Progression applied"
        );
        progressed
    }
}
