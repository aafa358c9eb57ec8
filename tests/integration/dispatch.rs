//! Integration tests for recovery resolution
//!
//! Tests cover:
//! - Default fallback for unregistered pairs
//! - Exact-match dispatch on both kinds
//! - Independence of resolved actions from registered prototypes

use super::test_utils::{
    count, counter, log_lines, CountingAction, COUNTING_NO_THROW, COUNTING_WITH_THROW,
};
use cmdloop::action::{EmitError, LogToFile, RepeatOnce, RepeatTwice, ThrowTestError};
use cmdloop::{Action, ActionKind, Failure, FailureKind, RecoveryRegistry};
use tempfile::TempDir;

#[test]
fn test_default_fallback_reports_failure_message() {
    let registry = RecoveryRegistry::new();
    let failure = Failure::new(FailureKind::new("fuel"), "not enough fuel to move");

    let recovery = registry.resolve(&ThrowTestError, &failure);

    assert_eq!(recovery.kind(), ActionKind::EMIT_ERROR);
    assert!(format!("{:?}", recovery).contains("not enough fuel to move"));
    assert!(recovery.execute().is_ok());
}

#[test]
fn test_unknown_failures_fall_back_too() {
    let registry = RecoveryRegistry::new();
    let failure = Failure::unknown(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "permission denied",
    ));

    let recovery = registry.resolve(&ThrowTestError, &failure);
    assert_eq!(recovery.kind(), ActionKind::EMIT_ERROR);
    assert!(format!("{:?}", recovery).contains("permission denied"));
}

#[test]
fn test_handler_does_not_leak_to_other_action_kinds() {
    let hits = counter();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        COUNTING_WITH_THROW,
        FailureKind::TEST,
        Box::new(CountingAction::no_throw(&hits)),
    );

    let sibling = CountingAction::no_throw(&counter());
    assert_eq!(sibling.kind(), COUNTING_NO_THROW);
    assert_eq!(
        registry.resolve(&sibling, &Failure::test()).kind(),
        ActionKind::EMIT_ERROR
    );

    // same behavior, different kind
    let once = RepeatOnce::new(Box::new(ThrowTestError));
    let twice = RepeatTwice::new(Box::new(ThrowTestError));
    registry.register(
        ActionKind::REPEAT_ONCE,
        FailureKind::TEST,
        Box::new(EmitError::new("handled once")),
    );
    assert!(format!("{:?}", registry.resolve(&once, &Failure::test())).contains("handled once"));
    assert!(!format!("{:?}", registry.resolve(&twice, &Failure::test()))
        .contains("handled once"));
}

#[test]
fn test_handler_does_not_leak_to_other_failure_kinds() {
    let mut registry = RecoveryRegistry::new();
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(EmitError::new("test handler")),
    );

    let other = Failure::new(FailureKind::new("rotation"), "cannot rotate");
    let recovery = registry.resolve(&ThrowTestError, &other);
    assert!(format!("{:?}", recovery).contains("No registered handler for 'cannot rotate'"));
}

#[test]
fn test_resolved_action_survives_prototype_replacement() {
    let temp_dir = TempDir::new().unwrap();
    let first_log = temp_dir.path().join("first.log");
    let second_log = temp_dir.path().join("second.log");

    let mut registry = RecoveryRegistry::new();
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(LogToFile::new("first", &first_log)),
    );
    let resolved = registry.resolve(&ThrowTestError, &Failure::test());

    // drops the original prototype
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(LogToFile::new("second", &second_log)),
    );
    resolved.execute().unwrap();

    assert_eq!(log_lines(&first_log).len(), 1);
    assert!(!second_log.exists());
}

#[test]
fn test_prototype_is_reusable_across_failures() {
    let hits = counter();
    let mut registry = RecoveryRegistry::new();
    registry.register(
        ActionKind::THROW_TEST_ERROR,
        FailureKind::TEST,
        Box::new(CountingAction::no_throw(&hits)),
    );

    for _ in 0..3 {
        registry
            .resolve(&ThrowTestError, &Failure::test())
            .execute()
            .unwrap();
    }
    assert_eq!(count(&hits), 3);
    assert_eq!(registry.len(), 1);
}
