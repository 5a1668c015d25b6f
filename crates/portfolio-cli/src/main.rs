//! portfolio CLI - Project Portfolio Schedule Metrics
//!
//! Command-line interface for computing schedule metrics and portfolio
//! status reports from project JSON files.

mod config;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use portfolio_core::{PortfolioReport, Project};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{OutputFormat, PortfolioConfig};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(author, version, about = "Project portfolio schedule metrics", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML)
    #[arg(long, env = "PORTFOLIO_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute stage and aggregate metrics for a project
    Metrics {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Compute as of this date (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Traffic-light report over one or more project files
    Report {
        /// Project JSON files (each holds one project or a list)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Report as of this date (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate schedule data
    Check {
        /// Project JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = PortfolioConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Metrics {
            file,
            as_of,
            format,
        }) => {
            let as_of = as_of.unwrap_or_else(today);
            let format = format.unwrap_or(config.output.format);
            for project in load_projects(&file)? {
                let metrics = project.metrics(as_of);
                match format {
                    OutputFormat::Text => print!("{}", render::metrics_text(&project, &metrics)),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
                }
            }
        }
        Some(Commands::Report {
            files,
            as_of,
            format,
        }) => {
            let as_of = as_of.unwrap_or_else(today);
            let mut projects = Vec::new();
            for file in &files {
                projects.extend(load_projects(file)?);
            }
            let report = PortfolioReport::new(&projects, as_of);
            match format.unwrap_or(config.output.format) {
                OutputFormat::Text => print!("{}", render::report_text(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Some(Commands::Check { file }) => {
            let mut issue_count = 0usize;
            for project in load_projects(&file)? {
                for issue in project.validate() {
                    println!("{}: {}", project.name, issue);
                    issue_count += 1;
                }
            }
            if issue_count > 0 {
                eprintln!("{} issue(s) found", issue_count);
                return Ok(ExitCode::FAILURE);
            }
            println!("No issues found");
        }
        Some(Commands::Config) => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        None => {
            println!("portfolio - Project Portfolio Schedule Metrics");
            println!("Run with --help for usage information");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Read a file holding either one project or a JSON array of projects
fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let projects = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|project| vec![project])
    }
    .with_context(|| format!("reading projects from {}", path.display()))?;

    tracing::info!(file = %path.display(), count = projects.len(), "loaded projects");
    Ok(projects)
}
