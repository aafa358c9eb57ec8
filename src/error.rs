//! Error types for the command loop.

use crate::types::{ActionKind, FailureKind};
use std::error::Error as StdError;
use thiserror::Error;

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// Typed failure raised by [`crate::action::Action::execute`].
///
/// The kind is the dispatch tag; the message is only ever shown to humans.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
    #[source]
    source: Option<BoxedSource>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The failure raised by the built-in test action.
    pub fn test() -> Self {
        Self::new(FailureKind::TEST, "Test exception")
    }

    /// Wrap an error that is not a recognised failure.
    pub fn unknown(err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        Self {
            kind: FailureKind::UNKNOWN,
            message: err.to_string(),
            source: Some(err.into()),
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::unknown(err)
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::unknown(err)
    }
}

/// Errors surfaced by [`crate::cmd_loop::run`].
#[derive(Debug, Error)]
pub enum LoopError {
    /// A recovery action failed while handling a failure of `action`.
    #[error("Recovery action {recovery} for {action} failed: {source}")]
    RecoveryFailed {
        action: ActionKind,
        recovery: ActionKind,
        source: Failure,
    },
}

impl LoopError {
    /// The failure that escaped the recovery action.
    pub fn failure(&self) -> &Failure {
        match self {
            LoopError::RecoveryFailed { source, .. } => source,
        }
    }
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}
