//! Schedule metrics pipeline
//!
//! Turns a list of schedule stages into participation weights, stage
//! statuses, planned and actual progress, deviation and a traffic light.
//!
//! # Pipeline
//!
//! 1. Participation: elapsed days per stage, normalized to weights summing to 100
//! 2. Stage planned %: from each stage's own dates
//! 3. Status: from actual %, planned % and end date
//! 4. Planned contribution: from status, weight and elapsed share of the project
//! 5. Actual contribution: actual % of weight, rounded per stage
//! 6. Aggregate: summed planned and actual, deviation, traffic light
//!
//! Every function here is total: malformed stages (missing dates, reversed
//! ranges, out-of-range percentages) are clamped or treated as contributing
//! nothing rather than failing the whole computation.

pub mod aggregate;
pub mod participation;
pub mod planned;
pub mod status;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use aggregate::{actual_contribution, actual_percent, AggregateMetrics, TrafficLight};
pub use participation::{normalize_to_hundred, Participation};
pub use planned::{planned_contribution, planned_percent, stage_planned_percent};
pub use status::{classify, classify_stage, ProjectStatus, StageStatus};

use crate::ScheduleStage;

/// Derived metrics for one stage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub label: String,
    /// Share of the project (0-100)
    pub weight: u32,
    /// Days counted toward the weight
    pub elapsed_days: i64,
    pub status: StageStatus,
    /// Stage planned completion (0-100)
    pub planned_percent: f64,
    /// Stage reported completion, clamped (0-100)
    pub actual_percent: f64,
    /// Contribution to project planned %
    pub planned_contribution: f64,
    /// Contribution to project actual %
    pub actual_contribution: u32,
    /// Stage planned % - stage actual %, rounded
    pub deviation: i32,
    pub traffic_light: TrafficLight,
}

/// Derived metrics for a whole schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Date the metrics were computed for
    pub as_of: NaiveDate,
    /// Σ elapsed days over all stages
    pub total_days: i64,
    pub stages: Vec<StageMetrics>,
    pub aggregate: AggregateMetrics,
    pub project_status: ProjectStatus,
}

impl ScheduleMetrics {
    /// Number of stages with the given status
    pub fn count(&self, status: StageStatus) -> usize {
        self.stages.iter().filter(|s| s.status == status).count()
    }
}

/// Run the full pipeline for `stages` as of `as_of`
pub fn compute(stages: &[ScheduleStage], as_of: NaiveDate) -> ScheduleMetrics {
    let participation = Participation::compute(stages, as_of);
    let total_days = participation.total_days;

    let stage_metrics: Vec<StageMetrics> = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| {
            let weight = participation.weight(i);
            let elapsed_days = participation.elapsed_days[i];
            let planned = stage_planned_percent(stage, as_of);
            let actual = stage.actual_clamped();
            let status = classify(stage, planned, as_of);
            let deviation = (planned - actual).round() as i32;

            StageMetrics {
                label: stage.label.clone(),
                weight,
                elapsed_days,
                status,
                planned_percent: planned,
                actual_percent: actual,
                planned_contribution: planned_contribution(status, weight, elapsed_days, total_days),
                actual_contribution: actual_contribution(actual, weight),
                deviation,
                traffic_light: TrafficLight::from_deviation(deviation),
            }
        })
        .collect();

    let aggregate = AggregateMetrics::new(
        planned_percent(stage_metrics.iter().map(|s| s.planned_contribution)),
        actual_percent(stage_metrics.iter().map(|s| s.actual_contribution)),
    );

    tracing::debug!(
        stages = stage_metrics.len(),
        total_days,
        planned = aggregate.planned_percent,
        actual = aggregate.actual_percent,
        "computed schedule metrics"
    );

    ScheduleMetrics {
        as_of,
        total_days,
        stages: stage_metrics,
        project_status: ProjectStatus::from_actual(aggregate.actual_percent),
        aggregate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn empty_schedule() {
        let metrics = compute(&[], date(2026, 1, 1));
        assert_eq!(metrics.aggregate, AggregateMetrics::empty());
        assert_eq!(metrics.project_status, ProjectStatus::NotStarted);
        assert_eq!(metrics.total_days, 0);
    }

    #[test]
    fn in_progress_stage_is_prorated_against_project_days() {
        let stages = vec![
            ScheduleStage::new("Design")
                .dates(date(2026, 1, 5), date(2026, 1, 14))
                .actual(100.0),
            ScheduleStage::new("Build")
                .dates(date(2026, 1, 15), date(2026, 1, 24))
                .actual(40.0),
        ];
        let metrics = compute(&stages, date(2026, 1, 20));

        assert_eq!(metrics.total_days, 16);
        assert_eq!(metrics.stages[0].weight, 62);
        assert_eq!(metrics.stages[1].weight, 38);
        assert_eq!(metrics.stages[0].status, StageStatus::Completed);
        assert_eq!(metrics.stages[1].status, StageStatus::InProgress);
        // 38 * 6 / 16
        assert_eq!(metrics.stages[1].planned_contribution, 14.25);
        assert_eq!(metrics.stages[1].planned_percent, 60.0);
        assert_eq!(metrics.stages[1].deviation, 20);
        assert_eq!(metrics.stages[1].traffic_light, TrafficLight::Red);
        assert_eq!(metrics.aggregate, AggregateMetrics::new(76, 77));
        assert_eq!(metrics.project_status, ProjectStatus::InProgress);
    }

    #[test]
    fn late_stage_counts_fully_planned() {
        let stages = vec![ScheduleStage::new("Overdue")
            .dates(date(2026, 1, 1), date(2026, 1, 10))
            .actual(50.0)];
        let metrics = compute(&stages, date(2026, 1, 20));

        assert_eq!(metrics.stages[0].status, StageStatus::Late);
        assert_eq!(metrics.stages[0].weight, 100);
        assert_eq!(metrics.aggregate.planned_percent, 100);
        assert_eq!(metrics.aggregate.actual_percent, 50);
        assert_eq!(metrics.aggregate.deviation, 50);
        assert_eq!(metrics.count(StageStatus::Late), 1);
    }

    #[test]
    fn future_stages_weigh_nothing() {
        let stages = vec![
            ScheduleStage::new("Now")
                .dates(date(2026, 1, 1), date(2026, 1, 31))
                .actual(10.0),
            ScheduleStage::new("Later").dates(date(2026, 3, 1), date(2026, 3, 31)),
        ];
        let metrics = compute(&stages, date(2026, 1, 10));

        assert_eq!(metrics.stages[0].weight, 100);
        assert_eq!(metrics.stages[1].weight, 0);
        assert_eq!(metrics.stages[1].status, StageStatus::NotStarted);
    }
}
