//! Stage and project status classification

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{clamp_percent, ScheduleStage};

/// Status of a single schedule stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageStatus {
    NotStarted,
    InProgress,
    Completed,
    /// Past its end date without being reported complete
    Late,
}

impl StageStatus {
    /// Get the display string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::NotStarted => "Not Started",
            StageStatus::InProgress => "In Progress",
            StageStatus::Completed => "Completed",
            StageStatus::Late => "Late",
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a whole project.
///
/// Derived from aggregate actual progress only, so there is no late state at
/// this level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// Classify from aggregate actual percentage (0-100)
    pub fn from_actual(actual_percent: u8) -> Self {
        match actual_percent {
            0 => ProjectStatus::NotStarted,
            p if p >= 100 => ProjectStatus::Completed,
            _ => ProjectStatus::InProgress,
        }
    }

    /// Get the display string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a stage given its planned percentage as of `today`.
///
/// Rules, first match wins:
/// 1. actual == 100 -> Completed
/// 2. planned == 0 and actual <= 0 -> Not Started
/// 3. end < today and actual < 100 -> Late
/// 4. actual > 0 and planned < 100 -> In Progress
/// 5. otherwise -> Not Started
pub fn classify(stage: &ScheduleStage, planned_percent: f64, today: NaiveDate) -> StageStatus {
    let actual = stage.actual_clamped();
    let planned = clamp_percent(planned_percent);

    if actual >= 100.0 {
        StageStatus::Completed
    } else if planned == 0.0 && actual <= 0.0 {
        StageStatus::NotStarted
    } else if stage.end.is_some_and(|end| end < today) {
        StageStatus::Late
    } else if actual > 0.0 && planned < 100.0 {
        StageStatus::InProgress
    } else {
        StageStatus::NotStarted
    }
}

/// Classify a stage using its stored planned percentage
pub fn classify_stage(stage: &ScheduleStage, today: NaiveDate) -> StageStatus {
    classify(stage, stage.planned_percent, today)
}
