pub mod cli;
pub mod config;
pub mod controller;
pub mod report;
pub mod worker;

pub use cli::Cli;
pub use config::Config;
pub use controller::Controller;
pub use report::{ConsoleReporter, Lifecycle, OutputFormat, RateSample, Reporter, RunSummary};
pub use worker::{CounterWorker, WorkerError, WorkerState};
