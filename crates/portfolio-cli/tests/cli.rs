//! CLI integration tests
//!
//! Run the `portfolio` binary against project files written to a temp dir.
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success |
//! | 1 | `check` found issues, or the input could not be read |

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const ROLLOUT: &str = r#"{
    "id": "p-rollout",
    "name": "Rollout",
    "owners": ["Ana"],
    "stages": [
        { "label": "Design", "start": "2026-01-01", "end": "2026-01-10", "actual_percent": 100 },
        { "label": "Build", "start": "2026-01-05", "end": "2026-01-31", "actual_percent": 40 }
    ]
}"#;

const OVERDUE: &str = r#"{
    "id": "p-overdue",
    "name": "Overdue",
    "stages": [
        { "label": "Migration", "startDate": "2026-01-01", "endDate": "2026-01-10", "actualPercent": 30 }
    ]
}"#;

fn portfolio() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_portfolio"));
    cmd.env_remove("PORTFOLIO_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str], file: &Path) -> Output {
    portfolio()
        .args(args)
        .arg(file)
        .output()
        .expect("failed to execute portfolio")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// metrics
// =============================================================================

#[test]
fn metrics_text_output() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "rollout.json", ROLLOUT);

    let output = portfolio()
        .args(["metrics", "--as-of", "2026-01-20"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Project: Rollout (as of 2026-01-20)"));
    assert!(text.contains("Design"));
    assert!(text.contains("Completed"));
    assert!(text.contains("In Progress"));
    assert!(!text.contains("Late"));
}

#[test]
fn metrics_json_output_parses() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "overdue.json", OVERDUE);

    let output = portfolio()
        .args(["metrics", "--as-of", "2026-01-15", "--format", "json"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["aggregate"]["planned_percent"], 100);
    assert_eq!(value["aggregate"]["actual_percent"], 30);
    assert_eq!(value["aggregate"]["deviation"], 70);
    assert_eq!(value["aggregate"]["traffic_light"], "Red");
    assert_eq!(value["stages"][0]["weight"], 100);
}

#[test]
fn config_file_sets_output_format() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "overdue.json", OVERDUE);
    let config = write(&dir, "portfolio.toml", "[output]\nformat = \"json\"\n");

    let output = portfolio()
        .env("PORTFOLIO_CONFIG", &config)
        .args(["metrics", "--as-of", "2026-01-15"])
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok());
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["metrics"], &dir.path().join("absent.json"));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}

#[test]
fn malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "broken.json", "{ \"name\": ");
    let output = run(&["metrics"], &file);
    assert_eq!(output.status.code(), Some(1));
}

// =============================================================================
// report
// =============================================================================

#[test]
fn report_across_files() {
    let dir = TempDir::new().unwrap();
    let rollout = write(&dir, "rollout.json", ROLLOUT);
    let overdue = write(&dir, "overdue.json", OVERDUE);

    let output = portfolio()
        .args(["report", "--as-of", "2026-01-15"])
        .arg(&rollout)
        .arg(&overdue)
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Portfolio status as of 2026-01-15: 2 projects (0 green, 1 yellow, 1 red)"));
    assert!(text.contains("Needs attention:"));
    assert!(text.contains("  - Overdue: 70 pts behind, 1 late stage(s)"));
}

#[test]
fn report_accepts_project_arrays() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "all.json", &format!("[{ROLLOUT}, {OVERDUE}]"));

    let output = run(&["report", "--as-of", "2026-01-15", "--format", "json"], &file);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["projects"].as_array().unwrap().len(), 2);
    assert_eq!(value["green"], 0);
    assert_eq!(value["yellow"], 1);
    assert_eq!(value["red"], 1);
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_clean_project_exits_0() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "rollout.json", ROLLOUT);
    let output = run(&["check"], &file);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No issues found"));
}

#[test]
fn check_reports_bad_stages_and_exits_1() {
    let dir = TempDir::new().unwrap();
    let file = write(
        &dir,
        "bad.json",
        r#"{
            "name": "Shaky",
            "stages": [
                { "label": "Backwards", "start": "2026-02-10", "end": "2026-02-01" },
                { "label": "Undated", "actual_percent": 150 }
            ]
        }"#,
    );

    let output = run(&["check"], &file);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("Shaky: Invalid schedule data in stage 'Backwards': end date before start date"));
    assert!(text.contains("stage 'Undated': missing start date"));
    assert!(text.contains("stage 'Undated': actual percent outside 0-100"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn config_prints_defaults() {
    let output = portfolio().arg("config").output().unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[lock]"));
    assert!(text.contains("ttl_minutes = 10"));
    assert!(text.contains("renew_interval_minutes = 5"));
    assert!(text.contains("format = \"text\""));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "bad.toml", "[lock]\nttl_minutes = 0\n");

    let output = portfolio()
        .arg("--config")
        .arg(&config)
        .arg("config")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
