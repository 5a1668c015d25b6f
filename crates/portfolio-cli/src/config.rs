//! CLI configuration file
//!
//! ```toml
//! [lock]
//! ttl_minutes = 10
//! renew_interval_minutes = 5
//!
//! [output]
//! format = "text"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use portfolio_lock::LockConfig;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Effective configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub lock: LockConfig,
    pub output: OutputConfig,
}

impl PortfolioConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        config
            .lock
            .validate()
            .with_context(|| format!("invalid [lock] section in {}", path.display()))?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }
}
