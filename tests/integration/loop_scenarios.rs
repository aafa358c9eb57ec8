//! Integration tests for draining the queue
//!
//! Tests cover:
//! - Loop continues after unhandled failures
//! - Registered handlers replace the default report
//! - File logging
//! - Deferred retry through the queue
//! - FIFO ordering of recovery work

use super::test_utils::{
    count, counter, journal, log_lines, CountingAction, Recorder, COUNTING_WITH_THROW,
    RECORDER_FAIL,
};
use cmdloop::action::{EnqueueClone, LogToFile, RepeatOnce, ThrowTestError};
use cmdloop::{run, Action, ActionKind, ActionQueue, FailureKind, RecoveryRegistry};
use tempfile::TempDir;

#[test]
fn test_loop_continues_after_unhandled_failure() {
    let registry = RecoveryRegistry::new();
    let queue = ActionQueue::new();
    let counter = counter();
    queue.push(Box::new(ThrowTestError));
    queue.push(Box::new(CountingAction::no_throw(&counter)));
    assert_eq!(queue.len(), 2);

    run(&queue, &registry).unwrap();

    assert!(queue.is_empty());
    assert_eq!(count(&counter), 1);
}

#[test]
fn test_registered_handler_runs_instead_of_default() {
    let counter = counter();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(CountingAction::no_throw(&counter)),
    );

    let queue = ActionQueue::new();
    queue.push(Box::new(ThrowTestError));
    let report = run(&queue, &registry).unwrap();

    assert!(queue.is_empty());
    assert_eq!(count(&counter), 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.recovered, 1);
}

#[test]
fn test_log_to_file_creates_log() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("exceptions_log_test.log");
    assert!(!log_path.exists());

    LogToFile::new("msg", &log_path).execute().unwrap();

    assert!(log_path.exists());
    let lines = log_lines(&log_path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("msg"));
}

#[test]
fn test_handler_enqueues_log_action() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("exceptions_log_test.log");

    let queue = ActionQueue::new();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(EnqueueClone::new(
            queue.clone(),
            Box::new(LogToFile::new("Test", &log_path)),
        )),
    );

    queue.push(Box::new(ThrowTestError));
    run(&queue, &registry).unwrap();

    assert!(queue.is_empty());
    assert_eq!(log_lines(&log_path).len(), 1);
}

#[test]
fn test_enqueued_repeat_runs_failing_action_again() {
    let counter = counter();
    let failing = CountingAction::with_throw(&counter);

    let queue = ActionQueue::new();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        COUNTING_WITH_THROW,
        FailureKind::TEST,
        Box::new(EnqueueClone::new(
            queue.clone(),
            Box::new(RepeatOnce::new(Box::new(failing.clone()))),
        )),
    );

    queue.push(Box::new(failing));
    let report = run(&queue, &registry).unwrap();

    assert!(queue.is_empty());
    // original execute + one repeat; the repeat's failure gets the default report
    assert_eq!(count(&counter), 2);
    assert_eq!(report.failed, 2);
}

#[test]
fn test_deferred_retry_runs_after_already_queued_work() {
    let journal = journal();
    let queue = ActionQueue::new();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        RECORDER_FAIL,
        FailureKind::TEST,
        Box::new(EnqueueClone::new(
            queue.clone(),
            Box::new(Recorder::new("retry", &journal, false)),
        )),
    );

    queue.push(Box::new(Recorder::new("a", &journal, false)));
    queue.push(Box::new(Recorder::new("b", &journal, true)));
    queue.push(Box::new(Recorder::new("c", &journal, false)));
    queue.push(Box::new(Recorder::new("d", &journal, false)));

    run(&queue, &registry).unwrap();

    assert_eq!(*journal.lock(), vec!["a", "b", "c", "d", "retry"]);
}

#[test]
fn test_queue_is_reusable_across_runs() {
    let counter = counter();
    let registry = RecoveryRegistry::new();
    let queue = ActionQueue::new();

    queue.push(Box::new(CountingAction::no_throw(&counter)));
    run(&queue, &registry).unwrap();
    queue.push(Box::new(CountingAction::with_throw(&counter)));
    run(&queue, &registry).unwrap();

    assert!(queue.is_empty());
    assert_eq!(count(&counter), 2);
}
