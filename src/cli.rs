use clap::Parser;

use crate::report::OutputFormat;

#[derive(Parser, Debug, Default)]
#[command(name = "spinrate")]
#[command(about = "Measure busy-spin counter throughput on a background thread", long_about = None)]
pub struct Cli {
    /// Number of rate samples to take
    #[arg(short, long, value_name = "N")]
    pub samples: Option<u32>,

    /// Milliseconds between samples
    #[arg(short, long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
