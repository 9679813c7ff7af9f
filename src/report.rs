use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Starting,
    Started,
    Stopping,
    Stopped,
}

impl Lifecycle {
    pub fn status_line(&self) -> &str {
        match self {
            Lifecycle::Starting => "Starting counter worker...",
            Lifecycle::Started => "Counter worker started",
            Lifecycle::Stopping => "Stopping counter worker...",
            Lifecycle::Stopped => "Counter worker stopped",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RateSample {
    pub index: u32,
    pub count: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub rate: f64,
    pub timestamp: DateTime<Local>,
}

impl RateSample {
    pub fn new(index: u32, count: u64, interval: Duration) -> Self {
        let elapsed = interval * index;
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { count as f64 / secs } else { 0.0 };

        Self {
            index,
            count,
            elapsed,
            rate,
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub samples: Vec<RateSample>,
    pub final_count: u64,
    pub iterations: u64,
    pub wall_time: Duration,
}

pub trait Reporter {
    fn lifecycle(&mut self, event: Lifecycle) -> Result<()>;
    fn sample(&mut self, sample: &RateSample) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => {
                anyhow::bail!("Unknown output format '{}', expected 'text' or 'json'", other)
            }
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonLine<'a> {
    Starting,
    Started,
    Stopping,
    Stopped,
    Sample(&'a RateSample),
}

impl From<Lifecycle> for JsonLine<'_> {
    fn from(event: Lifecycle) -> Self {
        match event {
            Lifecycle::Starting => JsonLine::Starting,
            Lifecycle::Started => JsonLine::Started,
            Lifecycle::Stopping => JsonLine::Stopping,
            Lifecycle::Stopped => JsonLine::Stopped,
        }
    }
}

pub struct ConsoleReporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json(&mut self, line: &JsonLine<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line).context("Failed to serialize report line")?;
        writeln!(self.out).context("Failed to write report line")?;
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn lifecycle(&mut self, event: Lifecycle) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", event.status_line())
                    .context("Failed to write status line")?
            }
            OutputFormat::Json => self.write_json(&event.into())?,
        }
        self.out.flush().context("Failed to flush report output")
    }

    fn sample(&mut self, sample: &RateSample) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "Iters per second: {}", sample.rate)
                    .context("Failed to write rate line")?
            }
            OutputFormat::Json => self.write_json(&JsonLine::Sample(sample))?,
        }
        self.out.flush().context("Failed to flush report output")
    }
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
