use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use crate::report::{Lifecycle, RateSample, Reporter, RunSummary};
use crate::worker::CounterWorker;

pub struct Controller<R: Reporter> {
    reporter: R,
}

impl<R: Reporter> Controller<R> {
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    pub fn run(&mut self, sample_count: u32, sample_interval: Duration) -> Result<RunSummary> {
        if sample_count == 0 {
            anyhow::bail!("sample_count must be positive");
        }
        if sample_interval.is_zero() {
            anyhow::bail!("sample_interval must be positive");
        }

        tracing::info!(
            sample_count,
            interval_ms = sample_interval.as_millis() as u64,
            "Starting rate measurement"
        );

        self.reporter.lifecycle(Lifecycle::Starting)?;
        let mut worker = CounterWorker::new();
        let started_at = Instant::now();
        worker.start().context("Failed to start counter worker")?;
        self.reporter.lifecycle(Lifecycle::Started)?;

        let mut samples = Vec::new();
        for index in 1..=sample_count {
            std::thread::sleep(sample_interval);
            let sample = RateSample::new(index, worker.count(), sample_interval);
            tracing::debug!(index, count = sample.count, rate = sample.rate, "Sampled counter");
            self.reporter.sample(&sample)?;
            samples.push(sample);
        }

        self.reporter.lifecycle(Lifecycle::Stopping)?;
        worker.stop().context("Failed to stop counter worker")?;
        let iterations = worker.join().context("Failed to join counter worker")?;
        let wall_time = started_at.elapsed();
        self.reporter.lifecycle(Lifecycle::Stopped)?;

        let final_count = worker.count();
        tracing::info!(
            final_count,
            iterations,
            wall_time_ms = wall_time.as_millis() as u64,
            "Rate measurement finished"
        );

        Ok(RunSummary {
            samples,
            final_count,
            iterations,
            wall_time,
        })
    }
}
