use std::io;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "counter-worker";

type SpinBody = Box<dyn FnOnce() -> u64 + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to spawn counter worker thread")]
    Spawn(#[source] io::Error),
    #[error("counter worker has already been started")]
    AlreadyStarted,
    #[error("counter worker has not been started")]
    NotStarted,
    #[error("counter worker must be stopped before it can be joined")]
    JoinWhileRunning,
    #[error("counter worker thread has already been joined")]
    AlreadyJoined,
    #[error("counter worker thread panicked")]
    Panicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Running,
    Stopping,
    Stopped,
}

impl WorkerState {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkerState::Running)
    }
}

pub struct CounterWorker {
    counter: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    state: WorkerState,
    thread_handle: Option<JoinHandle<u64>>,
}

impl CounterWorker {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            state: WorkerState::Created,
            thread_handle: None,
        }
    }

    pub fn start(&mut self) -> Result<(), WorkerError> {
        self.start_with(|body| {
            thread::Builder::new()
                .name(WORKER_THREAD_NAME.to_string())
                .spawn(body)
        })
    }

    fn start_with<S>(&mut self, spawn: S) -> Result<(), WorkerError>
    where
        S: FnOnce(SpinBody) -> io::Result<JoinHandle<u64>>,
    {
        if self.state != WorkerState::Created {
            return Err(WorkerError::AlreadyStarted);
        }

        self.counter.store(0, Ordering::Relaxed);
        self.running.store(true, Ordering::Release);

        let counter = Arc::clone(&self.counter);
        let running = Arc::clone(&self.running);
        match spawn(Box::new(move || Self::spin(&counter, &running))) {
            Ok(handle) => {
                self.thread_handle = Some(handle);
                self.state = WorkerState::Running;
                tracing::debug!("Counter worker thread spawned");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                self.state = WorkerState::Stopped;
                tracing::error!("Failed to spawn counter worker thread: {}", e);
                Err(WorkerError::Spawn(e))
            }
        }
    }

    fn spin(counter: &AtomicU64, running: &AtomicBool) -> u64 {
        let mut iterations: u64 = 0;
        while running.load(Ordering::Acquire) {
            counter.fetch_add(1, Ordering::Relaxed);
            iterations += 1;
        }
        iterations
    }

    pub fn stop(&mut self) -> Result<(), WorkerError> {
        match self.state {
            WorkerState::Created => Err(WorkerError::NotStarted),
            WorkerState::Running => {
                self.running.store(false, Ordering::Release);
                self.state = WorkerState::Stopping;
                tracing::debug!("Counter worker stop requested");
                Ok(())
            }
            WorkerState::Stopping | WorkerState::Stopped => Ok(()),
        }
    }

    pub fn join(&mut self) -> Result<u64, WorkerError> {
        match self.state {
            WorkerState::Created => return Err(WorkerError::NotStarted),
            WorkerState::Running => return Err(WorkerError::JoinWhileRunning),
            WorkerState::Stopping | WorkerState::Stopped => {}
        }

        let handle = self.thread_handle.take().ok_or(WorkerError::AlreadyJoined)?;
        self.state = WorkerState::Stopped;

        let iterations = handle.join().map_err(|_| WorkerError::Panicked)?;
        tracing::debug!(iterations, "Counter worker thread joined");
        Ok(iterations)
    }

    pub fn shutdown(&mut self) -> Result<u64, WorkerError> {
        self.stop()?;
        self.join()
    }

    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn state(&self) -> WorkerState {
        match self.state {
            WorkerState::Stopping
                if self
                    .thread_handle
                    .as_ref()
                    .map_or(true, |handle| handle.is_finished()) =>
            {
                WorkerState::Stopped
            }
            state => state,
        }
    }
}

impl Default for CounterWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CounterWorker {
    fn drop(&mut self) {
        if self.thread_handle.is_none() {
            return;
        }

        if let Err(e) = self.stop() {
            tracing::error!("Error stopping counter worker: {}", e);
        }
        if let Err(e) = self.join() {
            tracing::error!("Error joining counter worker thread: {}", e);
        }
    }
}
