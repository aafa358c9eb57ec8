//! Actions: units of work drained by the command loop.
//!
//! Anything the loop can run implements [`Action`]. The kind returned by
//! [`Action::kind`] is what the recovery registry dispatches on, so two
//! otherwise identical actions with different kinds can be recovered
//! differently.

mod builtin;

pub use builtin::{
    EmitError, EnqueueClone, LogToFile, Macro, RepeatAndLog, RepeatOnce, RepeatTwice,
    ThrowTestError, DEFAULT_ERROR_LOG,
};

use crate::error::Failure;
use crate::types::ActionKind;
use std::fmt;

/// A unit of executable, clonable work.
pub trait Action: fmt::Debug + Send + Sync {
    /// Dispatch tag of this concrete variant.
    fn kind(&self) -> ActionKind;

    /// Perform the effect.
    fn execute(&self) -> Result<(), Failure>;

    /// A new, independently owned action that behaves identically.
    ///
    /// Shared collaborators (queue handles, counters) stay shared; owned state
    /// such as wrapped actions and messages is copied.
    fn clone_action(&self) -> Box<dyn Action>;
}

impl Clone for Box<dyn Action> {
    fn clone(&self) -> Self {
        self.clone_action()
    }
}
