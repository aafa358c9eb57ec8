//! Dispatch tags shared by actions, failures and the recovery registry.

use std::fmt;

/// Runtime identity of a concrete action variant.
///
/// Two actions dispatch the same way only if their kinds are equal; there is no
/// notion of a parent kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionKind(&'static str);

impl ActionKind {
    pub const THROW_TEST_ERROR: ActionKind = ActionKind("throw_test_error");
    pub const EMIT_ERROR: ActionKind = ActionKind("emit_error");
    pub const LOG_TO_FILE: ActionKind = ActionKind("log_to_file");
    pub const ENQUEUE_CLONE: ActionKind = ActionKind("enqueue_clone");
    pub const REPEAT_ONCE: ActionKind = ActionKind("repeat_once");
    pub const REPEAT_AND_LOG: ActionKind = ActionKind("repeat_and_log");
    pub const REPEAT_TWICE: ActionKind = ActionKind("repeat_twice");
    pub const MACRO: ActionKind = ActionKind("macro");

    /// Declare a kind for an action defined outside this crate.
    pub const fn new(name: &'static str) -> Self {
        ActionKind(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Runtime identity of a failure variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FailureKind(&'static str);

impl FailureKind {
    /// Raised by [`crate::action::ThrowTestError`].
    pub const TEST: FailureKind = FailureKind("test");
    /// Anything that escaped an action without being a recognised failure.
    pub const UNKNOWN: FailureKind = FailureKind("unknown");

    pub const fn new(name: &'static str) -> Self {
        FailureKind(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Composite lookup key of the recovery table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoveryKey {
    pub action: ActionKind,
    pub failure: FailureKind,
}

impl RecoveryKey {
    pub fn new(action: ActionKind, failure: FailureKind) -> Self {
        Self { action, failure }
    }
}

impl fmt::Display for RecoveryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.action, self.failure)
    }
}
