//! Command loop: drains an [`ActionQueue`], recovering failures through a
//! [`RecoveryRegistry`].
//!
//! Only the queued action's own failure is caught. The recovery action runs
//! inline and, if it fails too, that failure ends the run with
//! [`LoopError::RecoveryFailed`] and the failed action is left at the front of
//! the queue. Escalation that should itself be recoverable has to go back
//! through the queue (see [`crate::action::EnqueueClone`]).

use crate::error::{Failure, LoopError};
use crate::queue::{ActionQueue, ActionRef};
use crate::registry::RecoveryRegistry;
use crate::types::FailureKind;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Counters for one call to [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Queued actions that completed without failing.
    pub executed: usize,
    /// Queued actions that failed and were handed to the registry.
    pub failed: usize,
    /// Recovery actions that completed.
    pub recovered: usize,
}

/// Drain `queue` until it is empty.
pub fn run(queue: &ActionQueue, registry: &RecoveryRegistry) -> Result<RunReport, LoopError> {
    let mut report = RunReport::default();
    debug!(pending = queue.len(), "Command loop started");

    while let Some(action) = queue.front() {
        match execute_queued(&action) {
            Ok(()) => {
                report.executed += 1;
            }
            Err(failure) => {
                report.failed += 1;
                warn!(
                    action = %action.kind(),
                    failure_kind = %failure.kind(),
                    failure = %failure,
                    "Action failed"
                );
                let recovery = registry.resolve(&*action, &failure);
                if let Err(source) = recovery.execute() {
                    error!(
                        action = %action.kind(),
                        recovery = %recovery.kind(),
                        failure = %source,
                        "Recovery action failed"
                    );
                    return Err(LoopError::RecoveryFailed {
                        action: action.kind(),
                        recovery: recovery.kind(),
                        source,
                    });
                }
                report.recovered += 1;
            }
        }
        queue.pop();
    }

    info!(
        executed = report.executed,
        failed = report.failed,
        recovered = report.recovered,
        "Command loop drained"
    );
    Ok(report)
}

/// Execute a queued action, turning an escaped panic into an unknown failure.
fn execute_queued(action: &ActionRef) -> Result<(), Failure> {
    debug!(action = %action.kind(), "Executing action");
    match panic::catch_unwind(AssertUnwindSafe(|| action.execute())) {
        Ok(result) => result,
        Err(payload) => Err(Failure::new(FailureKind::UNKNOWN, panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "Unknown failure encountered".to_string()
    }
}
