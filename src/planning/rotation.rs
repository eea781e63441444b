//! Recency-weighted workout rotation.
//!
//! Draws are seeded from the plan seed, the week number and the draw's
//! position within the week, so the same candidates and history always give
//! the same pick.

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::PlanError;
use crate::storage::config::RotationSettings;
use crate::workouts::{Phase, Workout};

/// Workouts chosen in one week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekSelections {
    pub week_number: u32,
    pub workout_ids: Vec<String>,
}

/// Trailing window of recent selections, carried across the weeks of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationHistory {
    window_weeks: usize,
    weeks: VecDeque<WeekSelections>,
}

impl Default for RotationHistory {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RotationHistory {
    pub fn new(window_weeks: usize) -> Self {
        Self {
            window_weeks,
            weeks: VecDeque::new(),
        }
    }

    /// Start recording a week. Replanning the current week discards its
    /// earlier picks; weeks that fell out of the window are dropped.
    pub fn begin_week(&mut self, week_number: u32) {
        match self.weeks.back_mut() {
            Some(last) if last.week_number == week_number => last.workout_ids.clear(),
            _ => self.weeks.push_back(WeekSelections {
                week_number,
                workout_ids: Vec::new(),
            }),
        }

        let window = self.window_weeks as u32;
        self.weeks
            .retain(|w| w.week_number + window >= week_number && w.week_number <= week_number);
    }

    /// Record a pick for the current week.
    pub fn record(&mut self, workout_id: &str) {
        if let Some(current) = self.weeks.back_mut() {
            current.workout_ids.push(workout_id.to_string());
        }
    }

    /// How often a workout was picked inside the window, current week included.
    pub fn recent_uses(&self, workout_id: &str) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.workout_ids.iter())
            .filter(|id| id.as_str() == workout_id)
            .count()
    }

    /// Picks made so far in the current week.
    pub fn current_week_ids(&self) -> &[String] {
        self.weeks
            .back()
            .map(|w| w.workout_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Number of the week currently being recorded.
    pub fn current_week(&self) -> Option<u32> {
        self.weeks.back().map(|w| w.week_number)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &WeekSelections> {
        self.weeks.iter()
    }
}

/// Weighted, recency-penalized workout draw.
#[derive(Debug, Clone)]
pub struct RotationStrategy {
    settings: RotationSettings,
}

impl RotationStrategy {
    pub fn new(settings: RotationSettings) -> Self {
        Self { settings }
    }

    /// Draw weight of a candidate: `selection_weight × decay^uses × phase_weight`.
    pub fn weight(&self, workout: &Workout, phase: Phase, history: &RotationHistory) -> f64 {
        let uses = history.recent_uses(&workout.id) as i32;
        let phase_weight = if workout.suits_phase(phase) {
            1.0
        } else {
            self.settings.fallback_phase_weight
        };
        workout.selection_weight * self.settings.recency_decay.powi(uses) * phase_weight
    }

    /// Pick one candidate and record it in the history.
    pub fn select<'a>(
        &self,
        candidates: &[&'a Workout],
        phase: Phase,
        week_number: u32,
        history: &mut RotationHistory,
    ) -> Result<&'a Workout, PlanError> {
        if candidates.is_empty() {
            return Err(PlanError::SelectionError {
                phase,
                intensity: None,
                tried: vec![phase],
            });
        }

        let mut weights: Vec<f64> = candidates
            .iter()
            .map(|w| self.weight(w, phase, history).max(0.0))
            .collect();

        if self.settings.strict_variety {
            let uses: Vec<usize> = candidates
                .iter()
                .map(|w| history.recent_uses(&w.id))
                .collect();
            let fewest = uses.iter().copied().min().unwrap_or(0);
            for (weight, count) in weights.iter_mut().zip(&uses) {
                if *count > fewest {
                    *weight = 0.0;
                }
            }
        }

        let draw_index = history.current_week_ids().len() as u64;
        let mut rng = ChaCha8Rng::seed_from_u64(draw_seed(self.settings.seed, week_number, draw_index));
        let position = weighted_pick(&weights, &mut rng);
        let chosen = candidates[position];

        tracing::debug!(
            week = week_number,
            workout = %chosen.id,
            weight = weights[position],
            candidates = candidates.len(),
            "Rotation pick"
        );
        history.record(&chosen.id);
        Ok(chosen)
    }
}

fn draw_seed(seed: u64, week_number: u32, draw_index: u64) -> u64 {
    seed ^ (week_number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ draw_index.wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}

/// Index drawn proportionally to `weights`; the first entry when every
/// weight is zero.
fn weighted_pick<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    match WeightedIndex::<f64>::new(weights) {
        Ok(distribution) => distribution.sample(rng),
        Err(WeightedError::AllWeightsZero | WeightedError::NoItem) => 0,
        Err(err) => {
            tracing::warn!(%err, ?weights, "Unusable rotation weights");
            0
        }
    }
}
