use anyhow::{Context, Result};
use std::time::Duration;

use crate::cli::Cli;
use crate::report::OutputFormat;

pub const DEFAULT_SAMPLES: u32 = 5;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

const SAMPLES_VAR: &str = "SPINRATE_SAMPLES";
const INTERVAL_VAR: &str = "SPINRATE_INTERVAL_MS";
const FORMAT_VAR: &str = "SPINRATE_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub samples: u32,
    pub interval_ms: u64,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            samples: DEFAULT_SAMPLES,
            interval_ms: DEFAULT_INTERVAL_MS,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let samples = match lookup(SAMPLES_VAR) {
            Some(v) => v.trim().parse().with_context(|| {
                format!("{} must be a positive integer, got '{}'", SAMPLES_VAR, v)
            })?,
            None => defaults.samples,
        };

        let interval_ms = match lookup(INTERVAL_VAR) {
            Some(v) => v.trim().parse().with_context(|| {
                format!("{} must be a positive integer, got '{}'", INTERVAL_VAR, v)
            })?,
            None => defaults.interval_ms,
        };

        let format = match lookup(FORMAT_VAR) {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}", FORMAT_VAR))?,
            None => defaults.format,
        };

        let config = Config {
            samples,
            interval_ms,
            format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_cli(mut self, cli: &Cli) -> Result<Self> {
        if let Some(samples) = cli.samples {
            self.samples = samples;
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            anyhow::bail!("Sample count must be positive");
        }
        if self.interval_ms == 0 {
            anyhow::bail!("Sample interval must be positive");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
