//! Weekday placement.
//!
//! Placement runs in two passes. A greedy pass follows the coaching
//! preferences (long rides on the weekend, hard sessions mid-week). When that
//! leaves fatigue-spacing penalties, every placement is searched and a
//! strictly better one replaces the greedy result. The scheduler never fails.

use chrono::Weekday;

use super::assignment::WorkoutAssignment;
use super::error::{PlanWarning, SpacingConflict, SpacingReason};
use super::week::{day_index, is_weekend, WEEK};
use crate::storage::config::SchedulingSettings;
use crate::workouts::{Intensity, Workout};

/// Preferred days for hard sessions, in order.
const HARD_DAY_PREFERENCE: [Weekday; 4] = [Weekday::Tue, Weekday::Thu, Weekday::Sat, Weekday::Sun];

/// Placement quality; lower is better, penalties dominate preference misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementScore {
    pub penalties: u32,
    pub misses: u32,
}

/// Result of placing one week's workouts.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Assignments in Monday-first order
    pub assignments: Vec<WorkoutAssignment>,
    pub score: PlacementScore,
    /// Spacing warning when the best placement still has penalties
    pub warning: Option<PlanWarning>,
}

/// Places chosen workouts on available weekdays.
#[derive(Debug, Clone)]
pub struct WeekdayScheduler {
    long_ride_threshold_min: f64,
    high_fatigue_gap_days: u32,
}

impl Default for WeekdayScheduler {
    fn default() -> Self {
        Self::new(&SchedulingSettings::default())
    }
}

impl WeekdayScheduler {
    pub fn new(settings: &SchedulingSettings) -> Self {
        Self {
            long_ride_threshold_min: settings.long_ride_threshold_min,
            high_fatigue_gap_days: settings.high_fatigue_gap_days,
        }
    }

    /// Assign each workout to a distinct available day.
    pub fn assign(&self, mut workouts: Vec<Workout>, available_days: &[Weekday]) -> ScheduleOutcome {
        let days: Vec<Weekday> = WEEK
            .iter()
            .copied()
            .filter(|d| available_days.contains(d))
            .collect();

        if workouts.len() > days.len() {
            tracing::warn!(
                workouts = workouts.len(),
                days = days.len(),
                "More workouts than training days, dropping the excess"
            );
            workouts.truncate(days.len());
        }

        let mut placement = self.greedy(&workouts, &days);
        let mut score = self.score(&workouts, &placement, &days);

        if score.penalties > 0 {
            let mut best = (score, placement.clone());
            let mut current = vec![None; workouts.len()];
            let mut used = vec![false; days.len()];
            self.search(&workouts, &days, 0, &mut current, &mut used, &mut best);
            if best.0 < score {
                tracing::debug!(
                    from = ?score,
                    to = ?best.0,
                    "Exhaustive placement improved on greedy"
                );
                score = best.0;
                placement = best.1;
            }
        }

        let conflicts = self.conflicts(&workouts, &placement);
        let warning = if conflicts.is_empty() {
            None
        } else {
            for conflict in &conflicts {
                tracing::warn!(%conflict, "Workout spacing");
            }
            Some(PlanWarning::WorkoutSpacing { conflicts })
        };

        let mut assignments: Vec<WorkoutAssignment> = workouts
            .into_iter()
            .zip(placement)
            .map(|(workout, day)| WorkoutAssignment::new(day, workout))
            .collect();
        assignments.sort_by_key(|a| day_index(a.weekday));

        ScheduleOutcome {
            assignments,
            score,
            warning,
        }
    }

    fn is_long(&self, workout: &Workout) -> bool {
        workout.base_duration_min > self.long_ride_threshold_min
    }

    /// Preference-driven placement. Every workout gets a day.
    fn greedy(&self, workouts: &[Workout], days: &[Weekday]) -> Vec<Weekday> {
        let mut slots: Vec<Option<Weekday>> = vec![None; workouts.len()];
        let mut free: Vec<Weekday> = days.to_vec();

        let take = |free: &mut Vec<Weekday>, day: Weekday| free.retain(|d| *d != day);

        // long rides, longest first, onto weekend days
        let mut long: Vec<usize> = (0..workouts.len())
            .filter(|&i| self.is_long(&workouts[i]))
            .collect();
        long.sort_by(|&a, &b| {
            workouts[b]
                .base_duration_min
                .total_cmp(&workouts[a].base_duration_min)
        });
        for i in long {
            let mut weekend: Vec<Weekday> = free.iter().copied().filter(|d| is_weekend(*d)).collect();
            weekend.sort_by_key(|d| !workouts[i].suits_weekday(*d));
            if let Some(&day) = weekend.first() {
                slots[i] = Some(day);
                take(&mut free, day);
            }
        }

        // hard sessions, most fatiguing first, mid-week then weekend
        let mut hard: Vec<usize> = (0..workouts.len())
            .filter(|&i| slots[i].is_none() && workouts[i].intensity == Intensity::Hard)
            .collect();
        hard.sort_by(|&a, &b| {
            workouts[b]
                .characteristics
                .fatigue_cost
                .cmp(&workouts[a].characteristics.fatigue_cost)
        });
        for i in hard {
            let preferred: Vec<Weekday> = HARD_DAY_PREFERENCE
                .iter()
                .copied()
                .filter(|d| free.contains(d))
                .collect();
            let clashes = |day: Weekday| {
                slots.iter().enumerate().any(|(j, slot)| match slot {
                    Some(other) => self.conflict_reason(&workouts[i], day, &workouts[j], *other).is_some(),
                    None => false,
                })
            };
            let day = preferred
                .iter()
                .copied()
                .find(|d| !clashes(*d))
                .or_else(|| preferred.first().copied());
            if let Some(day) = day {
                slots[i] = Some(day);
                take(&mut free, day);
            }
        }

        // everything else in day order, preferred weekdays first
        for i in 0..workouts.len() {
            if slots[i].is_some() {
                continue;
            }
            let day = free
                .iter()
                .copied()
                .find(|d| workouts[i].suits_weekday(*d))
                .or_else(|| free.first().copied());
            if let Some(day) = day {
                slots[i] = Some(day);
                take(&mut free, day);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Weekday::Mon))
            .collect()
    }

    fn search(
        &self,
        workouts: &[Workout],
        days: &[Weekday],
        position: usize,
        current: &mut [Option<Weekday>],
        used: &mut [bool],
        best: &mut (PlacementScore, Vec<Weekday>),
    ) {
        if position == workouts.len() {
            let placement: Vec<Weekday> = current.iter().flatten().copied().collect();
            let score = self.score(workouts, &placement, days);
            if score < best.0 {
                *best = (score, placement);
            }
            return;
        }

        for (d, day) in days.iter().enumerate() {
            if used[d] {
                continue;
            }
            used[d] = true;
            current[position] = Some(*day);
            self.search(workouts, days, position + 1, current, used, best);
            current[position] = None;
            used[d] = false;
        }
    }

    /// Score a complete placement.
    pub fn score(&self, workouts: &[Workout], placement: &[Weekday], days: &[Weekday]) -> PlacementScore {
        let penalties = self.conflicts(workouts, placement).len() as u32;
        let weekend_available = days.iter().any(|d| is_weekend(*d));

        let misses = workouts
            .iter()
            .zip(placement)
            .map(|(workout, day)| {
                let mut misses = 0;
                if weekend_available && self.is_long(workout) && !is_weekend(*day) {
                    misses += 1;
                }
                if workout.intensity == Intensity::Hard && !HARD_DAY_PREFERENCE.contains(day) {
                    misses += 1;
                }
                if !workout.suits_weekday(*day) {
                    misses += 1;
                }
                misses
            })
            .sum();

        PlacementScore { penalties, misses }
    }

    /// Offending pairs in a placement, one entry per pair.
    pub fn conflicts(&self, workouts: &[Workout], placement: &[Weekday]) -> Vec<SpacingConflict> {
        let mut order: Vec<usize> = (0..placement.len()).collect();
        order.sort_by_key(|&i| day_index(placement[i]));

        let mut conflicts = Vec::new();
        for (n, &i) in order.iter().enumerate() {
            for &j in &order[n + 1..] {
                if let Some(reason) =
                    self.conflict_reason(&workouts[i], placement[i], &workouts[j], placement[j])
                {
                    conflicts.push(SpacingConflict {
                        first_day: placement[i],
                        first_workout: workouts[i].id.clone(),
                        second_day: placement[j],
                        second_workout: workouts[j].id.clone(),
                        reason,
                    });
                }
            }
        }
        conflicts
    }

    fn conflict_reason(
        &self,
        a: &Workout,
        a_day: Weekday,
        b: &Workout,
        b_day: Weekday,
    ) -> Option<SpacingReason> {
        let gap = (day_index(a_day) - day_index(b_day)).unsigned_abs();
        if a.intensity == Intensity::Hard && b.intensity == Intensity::Hard && gap == 1 {
            Some(SpacingReason::AdjacentHardDays)
        } else if a.is_high_fatigue() && b.is_high_fatigue() && gap <= self.high_fatigue_gap_days {
            Some(SpacingReason::HighFatigueTooClose)
        } else {
            None
        }
    }
}
