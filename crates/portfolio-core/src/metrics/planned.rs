//! Planned progress
//!
//! Two planned values exist:
//! - the per-stage display value, from the stage's own dates
//! - the project value, from each stage's status-dependent contribution

use chrono::NaiveDate;

use super::status::StageStatus;
use crate::dates::days_between;
use crate::ScheduleStage;

/// Planned completion of a single stage as of `as_of` (0-100, whole points).
///
/// 0 before the stage starts, 100 from its end date on, linear in between.
/// Undated and open-ended stages have nothing due and report 0.
pub fn stage_planned_percent(stage: &ScheduleStage, as_of: NaiveDate) -> f64 {
    let (Some(start), Some(end)) = (stage.start, stage.end) else {
        return 0.0;
    };
    if as_of < start {
        return 0.0;
    }
    if as_of >= end {
        return 100.0;
    }
    let span = days_between(start, end);
    let elapsed = days_between(start, as_of);
    (100.0 * elapsed as f64 / span as f64).round().clamp(0.0, 100.0)
}

/// A stage's contribution to project planned progress.
///
/// In-progress stages are pro-rated by their elapsed days over the whole
/// project's elapsed days, not over their own span.
pub fn planned_contribution(
    status: StageStatus,
    weight: u32,
    elapsed_days: i64,
    total_days: i64,
) -> f64 {
    match status {
        StageStatus::NotStarted => 0.0,
        StageStatus::Completed | StageStatus::Late => weight as f64,
        StageStatus::InProgress if total_days > 0 => {
            weight as f64 * (elapsed_days.max(0) as f64 / total_days as f64)
        }
        StageStatus::InProgress => 0.0,
    }
}

/// Sum contributions into a project planned percentage, clamped to 0-100
pub fn planned_percent(contributions: impl IntoIterator<Item = f64>) -> u8 {
    let total: f64 = contributions.into_iter().sum();
    if total.is_nan() {
        return 0;
    }
    total.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn stage_plan_follows_calendar() {
        let s = ScheduleStage::new("s").dates(date(2026, 1, 1), date(2026, 1, 10));
        assert_eq!(stage_planned_percent(&s, date(2025, 12, 31)), 0.0);
        // first day counts as elapsed
        assert_eq!(stage_planned_percent(&s, date(2026, 1, 1)), 10.0);
        assert_eq!(stage_planned_percent(&s, date(2026, 1, 4)), 40.0);
        assert_eq!(stage_planned_percent(&s, date(2026, 1, 10)), 100.0);
        assert_eq!(stage_planned_percent(&s, date(2026, 3, 1)), 100.0);
    }

    #[test]
    fn stage_plan_without_dates_is_zero() {
        assert_eq!(
            stage_planned_percent(&ScheduleStage::new("u"), date(2026, 1, 1)),
            0.0
        );
        let ongoing = ScheduleStage::new("o").starting(date(2025, 1, 1));
        assert_eq!(stage_planned_percent(&ongoing, date(2026, 1, 1)), 0.0);
    }

    #[test]
    fn contribution_by_status() {
        assert_eq!(planned_contribution(StageStatus::NotStarted, 40, 10, 20), 0.0);
        assert_eq!(planned_contribution(StageStatus::Completed, 40, 10, 20), 40.0);
        assert_eq!(planned_contribution(StageStatus::Late, 40, 10, 20), 40.0);
        assert_eq!(planned_contribution(StageStatus::InProgress, 40, 10, 20), 20.0);
        assert_eq!(planned_contribution(StageStatus::InProgress, 40, 10, 0), 0.0);
    }

    #[test]
    fn project_plan_is_clamped_and_rounded() {
        assert_eq!(planned_percent(std::iter::empty()), 0);
        assert_eq!(planned_percent([40.0, 20.4]), 60);
        assert_eq!(planned_percent([40.0, 20.5]), 61);
        assert_eq!(planned_percent([80.0, 60.0]), 100);
        assert_eq!(planned_percent([-5.0]), 0);
    }
}
