//! Project and Portfolio Status Reports
//!
//! Reports answer the question: "How are my projects doing right now?"
//!
//! # Core Concepts
//!
//! - **ProjectReport**: Aggregated metrics and stage counts for one project
//! - **PortfolioReport**: Project reports plus traffic-light counts
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use portfolio_core::{Project, ProjectReport, ScheduleStage, TrafficLight};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
//! let project = Project::new("Intranet")
//!     .stage(ScheduleStage::new("Build").dates(d(1, 1), d(1, 10)).actual(100.0));
//!
//! let report = ProjectReport::from_project(&project, d(1, 20));
//! assert_eq!(report.actual_percent, 100);
//! assert_eq!(report.traffic_light, TrafficLight::Green);
//! assert_eq!(report.deviation_string(), "on plan");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{ProjectStatus, StageStatus, TrafficLight};
use crate::{Project, ProjectId};

// ============================================================================
// Project Report
// ============================================================================

/// Status summary of a single project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub project_id: ProjectId,
    pub project_name: String,

    /// As-of date for the report
    pub as_of: NaiveDate,

    pub status: ProjectStatus,

    /// Planned progress (0-100)
    pub planned_percent: u8,

    /// Actual progress (0-100)
    pub actual_percent: u8,

    /// planned - actual (positive = behind plan)
    pub deviation: i32,

    pub traffic_light: TrafficLight,

    pub total_stages: usize,
    pub completed_stages: usize,
    pub in_progress_stages: usize,
    pub not_started_stages: usize,
    pub late_stages: usize,

    /// Earliest stage start
    pub start_date: Option<NaiveDate>,

    /// Latest stage end
    pub finish_date: Option<NaiveDate>,

    /// Days from the as-of date to the latest stage end (negative once past)
    pub days_remaining: Option<i64>,
}

impl ProjectReport {
    /// Build a report for `project` as of `as_of`
    pub fn from_project(project: &Project, as_of: NaiveDate) -> Self {
        let metrics = project.metrics(as_of);
        let finish_date = project.last_end();

        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            as_of,
            status: metrics.project_status,
            planned_percent: metrics.aggregate.planned_percent,
            actual_percent: metrics.aggregate.actual_percent,
            deviation: metrics.aggregate.deviation,
            traffic_light: metrics.aggregate.traffic_light,
            total_stages: metrics.stages.len(),
            completed_stages: metrics.count(StageStatus::Completed),
            in_progress_stages: metrics.count(StageStatus::InProgress),
            not_started_stages: metrics.count(StageStatus::NotStarted),
            late_stages: metrics.count(StageStatus::Late),
            start_date: project.first_start(),
            finish_date,
            days_remaining: finish_date.map(|end| (end - as_of).num_days()),
        }
    }

    /// Get a formatted deviation string (e.g., "3 pts behind", "2 pts ahead", "on plan")
    pub fn deviation_string(&self) -> String {
        match self.deviation {
            0 => "on plan".to_string(),
            d if d > 0 => format!("{} pts behind", d),
            d => format!("{} pts ahead", d.abs()),
        }
    }
}

// ============================================================================
// Portfolio Report
// ============================================================================

/// Status summary over many projects
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub as_of: NaiveDate,
    pub projects: Vec<ProjectReport>,
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl PortfolioReport {
    /// Build a report for every project as of `as_of`
    pub fn new<'a>(projects: impl IntoIterator<Item = &'a Project>, as_of: NaiveDate) -> Self {
        let projects: Vec<ProjectReport> = projects
            .into_iter()
            .map(|p| ProjectReport::from_project(p, as_of))
            .collect();

        let count = |light: TrafficLight| {
            projects
                .iter()
                .filter(|r| r.traffic_light == light)
                .count()
        };
        let (green, yellow, red) = (
            count(TrafficLight::Green),
            count(TrafficLight::Yellow),
            count(TrafficLight::Red),
        );

        Self {
            as_of,
            projects,
            green,
            yellow,
            red,
        }
    }

    /// Red projects, furthest behind plan first
    pub fn needs_attention(&self) -> Vec<&ProjectReport> {
        let mut red: Vec<&ProjectReport> = self
            .projects
            .iter()
            .filter(|r| r.traffic_light == TrafficLight::Red)
            .collect();
        red.sort_by(|a, b| b.deviation.abs().cmp(&a.deviation.abs()));
        red
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleStage;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn on_track_project() -> Project {
        Project::new("On Track")
            .id("p-green")
            .stage(
                ScheduleStage::new("Design")
                    .dates(date(2026, 1, 1), date(2026, 1, 10))
                    .actual(100.0),
            )
            .stage(
                ScheduleStage::new("Build")
                    .dates(date(2026, 1, 11), date(2026, 1, 30))
                    .actual(0.0),
            )
    }

    fn overdue_project() -> Project {
        Project::new("Overdue")
            .id("p-red")
            .stage(
                ScheduleStage::new("Migration")
                    .dates(date(2026, 1, 1), date(2026, 1, 10))
                    .actual(30.0),
            )
    }

    #[test]
    fn test_report_empty_project() {
        let report = ProjectReport::from_project(&Project::new("Empty"), date(2026, 1, 5));

        assert_eq!(report.project_name, "Empty");
        assert_eq!(report.total_stages, 0);
        assert_eq!(report.status, ProjectStatus::NotStarted);
        assert_eq!(report.traffic_light, TrafficLight::Green);
        assert_eq!(report.start_date, None);
        assert_eq!(report.days_remaining, None);
    }

    #[test]
    fn test_report_stage_counts() {
        let report = ProjectReport::from_project(&on_track_project(), date(2026, 1, 10));

        assert_eq!(report.total_stages, 2);
        assert_eq!(report.completed_stages, 1);
        assert_eq!(report.not_started_stages, 1);
        assert_eq!(report.in_progress_stages, 0);
        assert_eq!(report.late_stages, 0);
        assert_eq!(report.actual_percent, 100);
        assert_eq!(report.status, ProjectStatus::Completed);
        assert_eq!(report.days_remaining, Some(20));
    }

    #[test]
    fn test_report_overdue() {
        let report = ProjectReport::from_project(&overdue_project(), date(2026, 1, 15));

        assert_eq!(report.late_stages, 1);
        assert_eq!(report.planned_percent, 100);
        assert_eq!(report.actual_percent, 30);
        assert_eq!(report.deviation, 70);
        assert_eq!(report.traffic_light, TrafficLight::Red);
        assert_eq!(report.deviation_string(), "70 pts behind");
        assert_eq!(report.days_remaining, Some(-5));
    }

    #[test]
    fn test_deviation_string_ahead() {
        let mut report = ProjectReport::from_project(&overdue_project(), date(2026, 1, 15));
        report.deviation = -3;
        assert_eq!(report.deviation_string(), "3 pts ahead");
    }

    #[test]
    fn test_portfolio_counts() {
        let projects = vec![on_track_project(), overdue_project()];
        let portfolio = PortfolioReport::new(&projects, date(2026, 1, 10));

        assert_eq!(portfolio.projects.len(), 2);
        assert_eq!(portfolio.green, 1);
        assert_eq!(portfolio.yellow, 0);
        assert_eq!(portfolio.red, 1);
    }

    #[test]
    fn test_needs_attention_orders_by_magnitude() {
        let mild = Project::new("Mild").stage(
            ScheduleStage::new("a")
                .dates(date(2026, 1, 1), date(2026, 1, 10))
                .actual(80.0),
        );
        let projects = vec![on_track_project(), mild, overdue_project()];
        let portfolio = PortfolioReport::new(&projects, date(2026, 1, 15));

        let names: Vec<&str> = portfolio
            .needs_attention()
            .iter()
            .map(|r| r.project_name.as_str())
            .collect();
        assert_eq!(names, vec!["Overdue", "Mild"]);
    }
}
