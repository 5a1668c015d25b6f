//! Plain-text rendering of metrics and reports

use std::fmt::Write;

use portfolio_core::{PortfolioReport, Project, ScheduleMetrics};

/// Per-stage table plus the aggregate line for one project
pub fn metrics_text(project: &Project, metrics: &ScheduleMetrics) -> String {
    let mut out = String::new();
    let agg = &metrics.aggregate;

    let _ = writeln!(out, "Project: {} (as of {})", project.name, metrics.as_of);
    let _ = writeln!(
        out,
        "Status: {}  Planned: {}%  Actual: {}%  Deviation: {:+}  [{}]",
        metrics.project_status, agg.planned_percent, agg.actual_percent, agg.deviation, agg.traffic_light
    );

    if metrics.stages.is_empty() {
        let _ = writeln!(out, "\nNo stages.");
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:<28} {:>6}  {:<12} {:>7} {:>7}  {}",
        "Stage", "Weight", "Status", "Planned", "Actual", "Light"
    );
    for stage in &metrics.stages {
        let _ = writeln!(
            out,
            "{:<28} {:>5}%  {:<12} {:>6}% {:>6}%  {}",
            truncate(&stage.label, 28),
            stage.weight,
            stage.status.as_str(),
            stage.planned_percent,
            stage.actual_percent,
            stage.traffic_light
        );
    }
    out
}

/// Portfolio summary table
pub fn report_text(report: &PortfolioReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Portfolio status as of {}: {} projects ({} green, {} yellow, {} red)",
        report.as_of,
        report.projects.len(),
        report.green,
        report.yellow,
        report.red
    );

    if report.projects.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:<28} {:<12} {:>7} {:>7} {:>9}  {}",
        "Project", "Status", "Planned", "Actual", "Deviation", "Light"
    );
    for project in &report.projects {
        let _ = writeln!(
            out,
            "{:<28} {:<12} {:>6}% {:>6}% {:>+9}  {}",
            truncate(&project.project_name, 28),
            project.status.as_str(),
            project.planned_percent,
            project.actual_percent,
            project.deviation,
            project.traffic_light
        );
    }

    let attention = report.needs_attention();
    if !attention.is_empty() {
        let _ = writeln!(out, "\nNeeds attention:");
        for project in attention {
            let late = if project.late_stages > 0 {
                format!(", {} late stage(s)", project.late_stages)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  - {}: {}{}",
                project.project_name,
                project.deviation_string(),
                late
            );
        }
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
