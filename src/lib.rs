//! cmdloop: command execution with typed, registrable failure recovery
//!
//! A queue of actions is drained one at a time. When an action fails, the
//! recovery registry picks a replacement action keyed on the pair (kind of the
//! failing action, kind of the failure) and the loop runs it before moving on.
//! Recovery actions compose: they can re-enqueue, repeat, log, and fail again
//! to trigger the next registered level of an escalation chain.

pub mod action;
pub mod cmd_loop;
pub mod config;
pub mod error;
pub mod logging;
pub mod queue;
pub mod registry;
pub mod types;

pub use action::Action;
pub use cmd_loop::{run, RunReport};
pub use error::{Failure, LoopError};
pub use queue::ActionQueue;
pub use registry::RecoveryRegistry;
pub use types::{ActionKind, FailureKind, RecoveryKey};
