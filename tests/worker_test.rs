use anyhow::Result;
use spinrate::worker::{CounterWorker, WorkerError, WorkerState};
use std::time::{Duration, Instant};

#[test]
fn test_new_worker_is_idle() {
    let worker = CounterWorker::new();

    assert_eq!(worker.state(), WorkerState::Created);
    assert_eq!(worker.count(), 0);
    assert!(!worker.is_running());
}

#[test]
fn test_counter_is_monotonic_while_running() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    assert!(worker.state().is_running());

    let mut previous = worker.count();
    for _ in 0..1000 {
        let current = worker.count();
        assert!(current >= previous, "counter went backwards: {} -> {}", previous, current);
        previous = current;
    }

    worker.shutdown()?;
    Ok(())
}

#[test]
fn test_stop_then_join_terminates_quickly() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    std::thread::sleep(Duration::from_millis(20));

    let stop_requested = Instant::now();
    worker.stop()?;
    worker.join()?;
    let waited = stop_requested.elapsed();

    assert!(waited < Duration::from_millis(100), "join took {:?}", waited);
    assert_eq!(worker.state(), WorkerState::Stopped);
    Ok(())
}

#[test]
fn test_no_lost_updates() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    std::thread::sleep(Duration::from_millis(50));

    let iterations = worker.shutdown()?;

    assert!(iterations > 0);
    assert_eq!(worker.count(), iterations);
    Ok(())
}

#[test]
fn test_idempotent_stop() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    worker.shutdown()?;

    let count = worker.count();
    worker.stop()?;
    worker.stop()?;

    assert_eq!(worker.count(), count);
    assert_eq!(worker.state(), WorkerState::Stopped);
    Ok(())
}

#[test]
fn test_immediate_stop_and_join() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    worker.stop()?;
    let iterations = worker.join()?;

    // The loop may or may not have observed the flag before the first increment.
    assert_eq!(worker.count(), iterations);
    Ok(())
}

#[test]
fn test_counter_advances_within_one_second() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    std::thread::sleep(Duration::from_secs(1));

    assert!(worker.count() > 0, "Worker should have iterated at least once");

    worker.shutdown()?;
    Ok(())
}

#[test]
fn test_stopping_becomes_stopped_once_loop_exits() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    worker.stop()?;

    let deadline = Instant::now() + Duration::from_secs(1);
    while worker.state() != WorkerState::Stopped && Instant::now() < deadline {
        std::thread::yield_now();
    }

    assert_eq!(worker.state(), WorkerState::Stopped);
    assert!(!worker.is_running());
    worker.join()?;
    Ok(())
}

#[test]
fn test_start_twice_is_rejected() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;

    assert!(matches!(worker.start(), Err(WorkerError::AlreadyStarted)));

    worker.shutdown()?;
    assert!(matches!(worker.start(), Err(WorkerError::AlreadyStarted)));
    Ok(())
}

#[test]
fn test_stop_before_start_is_rejected() {
    let mut worker = CounterWorker::new();

    assert!(matches!(worker.stop(), Err(WorkerError::NotStarted)));
    assert!(matches!(worker.join(), Err(WorkerError::NotStarted)));
}

#[test]
fn test_join_while_running_fails_fast() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;

    assert!(matches!(worker.join(), Err(WorkerError::JoinWhileRunning)));
    assert!(worker.is_running());

    worker.shutdown()?;
    Ok(())
}

#[test]
fn test_double_join_is_rejected() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    worker.shutdown()?;

    assert!(matches!(worker.join(), Err(WorkerError::AlreadyJoined)));
    Ok(())
}

#[test]
fn test_drop_stops_running_worker() -> Result<()> {
    let mut worker = CounterWorker::new();
    worker.start()?;
    std::thread::sleep(Duration::from_millis(10));

    let dropped_at = Instant::now();
    drop(worker);

    assert!(dropped_at.elapsed() < Duration::from_millis(100));
    Ok(())
}
