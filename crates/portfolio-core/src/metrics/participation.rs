//! Participation weights
//!
//! Each stage's share of the project is its elapsed days over the total
//! elapsed days of all stages, expressed as whole percentage points.
//!
//! # Algorithm
//!
//! 1. `total = Σ elapsed_i`; if zero, every weight is zero
//! 2. `raw_i = 100 * elapsed_i / total`
//! 3. Round each `raw_i` to the nearest integer
//! 4. Hand out the rounding difference `100 - Σ rounded_i` one point at a
//!    time to the stages whose rounding moved them furthest from `raw_i`
//!
//! Invariant: `Σ weight_i == 100` whenever `total > 0`.

use chrono::NaiveDate;

use crate::dates::days_elapsed_in_stage;
use crate::ScheduleStage;

/// Weights for a stage list, with the day counts they were derived from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participation {
    /// Per-stage weight (0-100), same order as the stages
    pub weights: Vec<u32>,
    /// Per-stage elapsed days
    pub elapsed_days: Vec<i64>,
    /// Σ elapsed days
    pub total_days: i64,
}

impl Participation {
    /// Compute participation for `stages` as of `reference`
    pub fn compute(stages: &[ScheduleStage], reference: NaiveDate) -> Self {
        let elapsed_days: Vec<i64> = stages
            .iter()
            .map(|stage| days_elapsed_in_stage(stage, reference))
            .collect();
        let total_days = elapsed_days.iter().sum();
        let weights = normalize_to_hundred(&elapsed_days);
        Self {
            weights,
            elapsed_days,
            total_days,
        }
    }

    /// Weight of stage `index` (0 when out of range)
    pub fn weight(&self, index: usize) -> u32 {
        self.weights.get(index).copied().unwrap_or(0)
    }
}

/// Scale non-negative day counts into integer weights summing to exactly 100.
///
/// Returns all zeros when the counts sum to zero.
pub fn normalize_to_hundred(days: &[i64]) -> Vec<u32> {
    let days: Vec<i64> = days.iter().map(|&d| d.max(0)).collect();
    let total: i64 = days.iter().sum();
    if total == 0 {
        return vec![0; days.len()];
    }

    let raw: Vec<f64> = days
        .iter()
        .map(|&d| 100.0 * d as f64 / total as f64)
        .collect();
    let mut weights: Vec<i64> = raw.iter().map(|r| r.round() as i64).collect();

    let diff = 100 - weights.iter().sum::<i64>();
    if diff != 0 {
        // Residual > 0 means the stage was rounded down. Adding points goes to
        // the most rounded-down stages, removing points to the most rounded-up,
        // so no weight can go negative.
        let step = diff.signum();
        let residual = |i: usize| (raw[i] - weights[i] as f64) * step as f64;
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| residual(b).total_cmp(&residual(a)).then(a.cmp(&b)));

        tracing::debug!(diff, "adjusting participation rounding");
        for &i in order.iter().take(diff.unsigned_abs() as usize) {
            weights[i] += step;
        }
    }

    weights.into_iter().map(|w| w.max(0) as u32).collect()
}
