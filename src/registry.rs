//! Recovery registry: maps (action kind, failure kind) to a recovery prototype.
//!
//! The table is an ordinary value. Build one per run (or per test), register
//! handlers with `&mut` access, then hand a shared reference to
//! [`crate::cmd_loop::run`].

use crate::action::{Action, EmitError};
use crate::error::Failure;
use crate::types::{ActionKind, FailureKind, RecoveryKey};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Registry of recovery prototypes keyed on exact kind pairs.
#[derive(Default)]
pub struct RecoveryRegistry {
    handlers: HashMap<RecoveryKey, Box<dyn Action>>,
}

impl RecoveryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recovery prototype; replaces any earlier entry for the pair.
    pub fn register(
        &mut self,
        action_kind: ActionKind,
        failure_kind: FailureKind,
        prototype: Box<dyn Action>,
    ) {
        let key = RecoveryKey::new(action_kind, failure_kind);
        debug!(%key, recovery = %prototype.kind(), "Registering recovery handler");
        if self.handlers.insert(key, prototype).is_some() {
            debug!(%key, "Replaced existing recovery handler");
        }
    }

    /// Whether a handler exists for exactly this pair.
    pub fn contains(&self, action_kind: ActionKind, failure_kind: FailureKind) -> bool {
        self.handlers
            .contains_key(&RecoveryKey::new(action_kind, failure_kind))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Pick the recovery action for `failure` raised by `failed`.
    ///
    /// Always returns something runnable: a clone of the registered prototype,
    /// or an [`EmitError`] reporting that no handler exists. A panic while
    /// building the key or cloning the prototype yields an [`EmitError`]
    /// reporting an unknown failure.
    pub fn resolve(&self, failed: &dyn Action, failure: &Failure) -> Box<dyn Action> {
        let lookup = panic::catch_unwind(AssertUnwindSafe(|| {
            let key = RecoveryKey::new(failed.kind(), failure.kind());
            let recovery = self.handlers.get(&key).map(|prototype| prototype.clone_action());
            (key, recovery)
        }));

        match lookup {
            Ok((key, Some(recovery))) => {
                debug!(%key, recovery = %recovery.kind(), "Resolved recovery handler");
                recovery
            }
            Ok((key, None)) => {
                warn!(%key, failure = %failure, "No registered handler");
                Box::new(EmitError::new(format!(
                    "No registered handler for '{}'",
                    failure.message()
                )))
            }
            Err(_) => {
                warn!(failure = %failure, "Recovery lookup panicked");
                Box::new(EmitError::new("Unknown failure encountered"))
            }
        }
    }
}

impl fmt::Debug for RecoveryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<String> = self
            .handlers
            .iter()
            .map(|(key, proto)| format!("{} -> {}", key, proto.kind()))
            .collect();
        entries.sort();
        f.debug_struct("RecoveryRegistry")
            .field("handlers", &entries)
            .finish()
    }
}
