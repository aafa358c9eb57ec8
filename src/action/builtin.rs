//! Built-in recovery and composite actions.

use super::Action;
use crate::config::CmdLoopConfig;
use crate::error::Failure;
use crate::queue::ActionQueue;
use crate::types::ActionKind;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Log file used when none is configured.
pub const DEFAULT_ERROR_LOG: &str = "errors.log";

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Always fails with [`Failure::test`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowTestError;

impl Action for ThrowTestError {
    fn kind(&self) -> ActionKind {
        ActionKind::THROW_TEST_ERROR
    }

    fn execute(&self) -> Result<(), Failure> {
        Err(Failure::test())
    }

    fn clone_action(&self) -> Box<dyn Action> {
        Box::new(*self)
    }
}

/// Writes a message to the diagnostic stream (stderr). Never fails.
#[derive(Debug, Clone)]
pub struct EmitError {
    message: String,
}

impl EmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Action for EmitError {
    fn kind(&self) -> ActionKind {
        ActionKind::EMIT_ERROR
    }

    fn execute(&self) -> Result<(), Failure> {
        debug!(error = %self.message, "Emitting error");
        emit(&self.message);
        Ok(())
    }

    fn clone_action(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

/// Best-effort write to stderr; a closed stream is not a failure.
fn emit(message: &str) {
    let _ = writeln!(io::stderr().lock(), "{}", message);
}

/// Appends `<timestamp> <message>` to a log file, stamped in UTC.
///
/// Open or write errors are reported on the diagnostic stream; the action
/// itself never fails.
#[derive(Debug, Clone)]
pub struct LogToFile {
    message: String,
    path: PathBuf,
}

impl LogToFile {
    pub fn new(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Log to [`DEFAULT_ERROR_LOG`] in the working directory.
    pub fn with_default_path(message: impl Into<String>) -> Self {
        Self::new(message, DEFAULT_ERROR_LOG)
    }

    /// Log to the configured error log.
    pub fn from_config(message: impl Into<String>, config: &CmdLoopConfig) -> Self {
        Self::new(message, config.error_log.clone())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = Utc::now().format(LOG_TIMESTAMP_FORMAT);
        writeln!(file, "{} {}", timestamp, self.message)?;
        file.flush()
    }
}

impl Action for LogToFile {
    fn kind(&self) -> ActionKind {
        ActionKind::LOG_TO_FILE
    }

    fn execute(&self) -> Result<(), Failure> {
        match self.append() {
            Ok(()) => {
                debug!(path = %self.path.display(), "Logged error to file");
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to write error log");
                emit(&format!(
                    "LogError: failed to open log file: {} - {}",
                    self.path.display(),
                    self.message
                ));
            }
        }
        Ok(())
    }

    fn clone_action(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

/// Pushes a fresh clone of `action` onto `queue`.
///
/// This defers a retry until everything already queued has run, instead of
/// re-entering the failed action immediately.
#[derive(Debug, Clone)]
pub struct EnqueueClone {
    queue: ActionQueue,
    action: Box<dyn Action>,
}

impl EnqueueClone {
    pub fn new(queue: ActionQueue, action: Box<dyn Action>) -> Self {
        Self { queue, action }
    }
}

impl Action for EnqueueClone {
    fn kind(&self) -> ActionKind {
        ActionKind::ENQUEUE_CLONE
    }

    fn execute(&self) -> Result<(), Failure> {
        debug!(enqueued = %self.action.kind(), "Enqueueing clone");
        self.queue.push(self.action.clone_action());
        Ok(())
    }

    fn clone_action(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}

// The repeat family shares behavior and differs only in kind, so that each
// level of an escalation chain can carry its own registry entry.
macro_rules! repeat_action {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            action: Box<dyn Action>,
        }

        impl $name {
            pub fn new(action: Box<dyn Action>) -> Self {
                Self { action }
            }

            /// The action this one re-executes.
            pub fn inner(&self) -> &dyn Action {
                self.action.as_ref()
            }
        }

        impl Action for $name {
            fn kind(&self) -> ActionKind {
                $kind
            }

            fn execute(&self) -> Result<(), Failure> {
                debug!(kind = %self.kind(), repeated = %self.action.kind(), "Repeating action");
                self.action.execute()
            }

            fn clone_action(&self) -> Box<dyn Action> {
                Box::new(self.clone())
            }
        }
    };
}

repeat_action!(
    /// Re-executes the wrapped action once; its failure propagates.
    RepeatOnce => ActionKind::REPEAT_ONCE
);

repeat_action!(
    /// Repeat whose kind marks "log if this fails again".
    RepeatAndLog => ActionKind::REPEAT_AND_LOG
);

repeat_action!(
    /// Repeat whose kind marks the first of two retries.
    RepeatTwice => ActionKind::REPEAT_TWICE
);

/// Runs a sequence of actions, stopping at the first failure.
///
/// The failure is returned as-is, so recovery is keyed on the macro's kind
/// and the child's failure kind.
#[derive(Debug, Clone, Default)]
pub struct Macro {
    actions: Vec<Box<dyn Action>>,
}

impl Macro {
    pub fn new(actions: Vec<Box<dyn Action>>) -> Self {
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Action for Macro {
    fn kind(&self) -> ActionKind {
        ActionKind::MACRO
    }

    fn execute(&self) -> Result<(), Failure> {
        for action in &self.actions {
            action.execute()?;
        }
        Ok(())
    }

    fn clone_action(&self) -> Box<dyn Action> {
        Box::new(self.clone())
    }
}
