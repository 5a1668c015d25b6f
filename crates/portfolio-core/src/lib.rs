//! # portfolio-core
//!
//! Domain model and schedule metrics for the portfolio tracker.
//!
//! This crate provides:
//! - Domain types: `Project`, `ScheduleStage`
//! - Day-count arithmetic (`dates`)
//! - The metrics pipeline: participation weights, stage status, planned and
//!   actual progress, deviation and traffic light (`metrics`)
//! - Project and portfolio status reports (`report`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use portfolio_core::{Project, ScheduleStage, TrafficLight};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
//! let project = Project::new("Warehouse rollout")
//!     .stage(ScheduleStage::new("Design").dates(d(1, 5), d(1, 14)).actual(100.0))
//!     .stage(ScheduleStage::new("Build").dates(d(1, 15), d(1, 24)).actual(40.0));
//!
//! let metrics = project.metrics(d(1, 20));
//! assert_eq!(metrics.aggregate.actual_percent, 77);
//! assert_eq!(metrics.aggregate.planned_percent, 76);
//! assert_eq!(metrics.aggregate.traffic_light, TrafficLight::Green);
//! ```

pub mod dates;
pub mod metrics;
pub mod report;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use metrics::{
    AggregateMetrics, ProjectStatus, ScheduleMetrics, StageMetrics, StageStatus, TrafficLight,
};
pub use report::{PortfolioReport, ProjectReport};

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a project
pub type ProjectId = String;

/// Unique identifier for a user
pub type UserId = String;

// ============================================================================
// Schedule Stage
// ============================================================================

/// One line of a project's schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStage {
    /// Human-readable label
    pub label: String,
    /// Stage start date (missing or unparseable dates deserialize as `None`)
    #[serde(default, deserialize_with = "dates::lenient_date", alias = "startDate")]
    pub start: Option<NaiveDate>,
    /// Stage end date; a stage without one is ongoing
    #[serde(default, deserialize_with = "dates::lenient_date", alias = "endDate")]
    pub end: Option<NaiveDate>,
    /// Planned completion (0-100), derived and stored for display
    #[serde(default, alias = "plannedPercent")]
    pub planned_percent: f64,
    /// Reported completion (0-100), entered by a person
    #[serde(default, alias = "actualPercent")]
    pub actual_percent: f64,
}

impl ScheduleStage {
    /// Create an undated stage with no progress
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: None,
            end: None,
            planned_percent: 0.0,
            actual_percent: 0.0,
        }
    }

    /// Set both start and end dates
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set only the start date (ongoing stage)
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the reported completion
    pub fn actual(mut self, percent: f64) -> Self {
        self.actual_percent = percent;
        self
    }

    /// Set the stored planned completion
    pub fn planned(mut self, percent: f64) -> Self {
        self.planned_percent = percent;
        self
    }

    /// Reported completion clamped into 0-100 (NaN counts as 0)
    pub fn actual_clamped(&self) -> f64 {
        clamp_percent(self.actual_percent)
    }

    /// Stored planned completion clamped into 0-100 (NaN counts as 0)
    pub fn planned_clamped(&self) -> f64 {
        clamp_percent(self.planned_percent)
    }

    /// Whether the stage is reported as fully done
    pub fn is_complete(&self) -> bool {
        self.actual_clamped() >= 100.0
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

// ============================================================================
// Project
// ============================================================================

/// A tracked project: ordered schedule stages plus descriptive metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (assigned by the project store on insert)
    #[serde(default)]
    pub id: ProjectId,
    /// Human-readable name
    pub name: String,
    /// People accountable for the project
    #[serde(default)]
    pub owners: Vec<String>,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Free-text objectives
    #[serde(default)]
    pub objectives: Vec<String>,
    /// Free-text risks
    #[serde(default)]
    pub risks: Vec<String>,
    /// Schedule stages, in display order
    #[serde(default, alias = "cronograma")]
    pub stages: Vec<ScheduleStage>,
}

impl Project {
    /// Create a new project with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            owners: Vec::new(),
            description: String::new(),
            objectives: Vec::new(),
            risks: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Set the project id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add an owner
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.push(owner.into());
        self
    }

    /// Append a schedule stage
    pub fn stage(mut self, stage: ScheduleStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Compute the full metrics pipeline as of the given date
    pub fn metrics(&self, as_of: NaiveDate) -> ScheduleMetrics {
        metrics::compute(&self.stages, as_of)
    }

    /// Recompute every stage's stored planned percentage as of the given date.
    ///
    /// Called before a project is written back so the stored display values
    /// match what the metrics pipeline derives.
    pub fn refresh_planned(&mut self, as_of: NaiveDate) {
        for stage in &mut self.stages {
            stage.planned_percent = metrics::stage_planned_percent(stage, as_of);
        }
    }

    /// First stage start date, if any stage is dated
    pub fn first_start(&self) -> Option<NaiveDate> {
        self.stages.iter().filter_map(|s| s.start).min()
    }

    /// Last stage end date, if any stage has one
    pub fn last_end(&self) -> Option<NaiveDate> {
        self.stages.iter().filter_map(|s| s.end).max()
    }

    /// Report stages whose data the metrics pipeline has to degrade around.
    ///
    /// Metrics never fail on these; this is for surfacing data quality.
    pub fn validate(&self) -> Vec<ScheduleError> {
        let mut issues = Vec::new();
        for stage in &self.stages {
            let mut issue = |reason: &str| {
                issues.push(ScheduleError::InvalidScheduleData {
                    stage: stage.label.clone(),
                    reason: reason.to_string(),
                });
            };

            match (stage.start, stage.end) {
                (None, _) => issue("missing start date"),
                (Some(_), None) => issue("missing end date (treated as ongoing)"),
                (Some(start), Some(end)) if end < start => issue("end date before start date"),
                _ => {}
            }
            if !(0.0..=100.0).contains(&stage.actual_percent) {
                issue("actual percent outside 0-100");
            }
        }
        issues
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Schedule data error
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid schedule data in stage '{stage}': {reason}")]
    InvalidScheduleData { stage: String, reason: String },

    #[error("Unparseable date: {0}")]
    InvalidDate(String),
}

// ============================================================================
// Tests
// ============================================================================
