//! Weekly planning input.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::error::PlanError;
use crate::workouts::Phase;

/// Monday-first weekday order used for every placement decision.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Targets and constraints for one training week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOverview {
    pub week_number: u32,
    pub phase: Phase,
    /// Days the athlete can train
    #[serde(alias = "available_weekdays")]
    pub training_days: Vec<Weekday>,
    pub hard_days: u32,
    pub easy_days: u32,
    /// Weekly training load target
    pub target_tss: f64,
    /// Weekly duration target in hours
    pub total_hours: f64,
}

impl WeekOverview {
    /// Number of sessions the week asks for.
    pub fn session_count(&self) -> usize {
        (self.hard_days + self.easy_days) as usize
    }

    /// Duration target in minutes.
    pub fn target_minutes(&self) -> f64 {
        self.total_hours * 60.0
    }

    /// Training days in Monday-first order, without duplicates.
    pub fn available_days(&self) -> Vec<Weekday> {
        WEEK.iter()
            .copied()
            .filter(|day| self.training_days.contains(day))
            .collect()
    }

    /// Reject weeks that cannot be planned at all.
    pub fn validate_shape(&self) -> Result<(), PlanError> {
        if self.session_count() == 0 {
            return Err(PlanError::InvalidWeek(format!(
                "week {} asks for no sessions",
                self.week_number
            )));
        }
        let days = self.available_days().len();
        if self.session_count() > days {
            return Err(PlanError::InvalidWeek(format!(
                "week {} asks for {} sessions but only {} training days are available",
                self.week_number,
                self.session_count(),
                days
            )));
        }
        if !(self.target_tss.is_finite() && self.target_tss > 0.0) {
            return Err(PlanError::InvalidWeek(format!(
                "week {} target load must be positive",
                self.week_number
            )));
        }
        if !(self.total_hours.is_finite() && self.total_hours > 0.0) {
            return Err(PlanError::InvalidWeek(format!(
                "week {} target hours must be positive",
                self.week_number
            )));
        }
        Ok(())
    }
}

/// Position of a weekday in Monday-first order.
pub fn day_index(day: Weekday) -> i32 {
    day.num_days_from_monday() as i32
}

/// Whether the day falls on a weekend.
pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}
