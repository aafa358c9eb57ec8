//! Action Queue
//!
//! FIFO of pending actions. The queue is a handle: clones share the same
//! underlying storage, which is how [`crate::action::EnqueueClone`] appends to the
//! queue that is currently being drained.

use crate::action::Action;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a queued action.
pub type ActionRef = Arc<dyn Action>;

#[derive(Clone, Default)]
pub struct ActionQueue {
    inner: Arc<Mutex<VecDeque<ActionRef>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action to the tail.
    pub fn push(&self, action: Box<dyn Action>) {
        self.inner.lock().push_back(Arc::from(action));
    }

    /// Remove and return the front action.
    pub fn pop(&self) -> Option<ActionRef> {
        self.inner.lock().pop_front()
    }

    /// The next action to run, without removing it.
    ///
    /// The lock is released before returning, so the caller may execute the
    /// action while it pushes onto this same queue.
    pub fn front(&self) -> Option<ActionRef> {
        self.inner.lock().front().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether two handles refer to the same queue.
    pub fn same_queue(&self, other: &ActionQueue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("ActionQueue")
            .field("pending", &guard.iter().map(|a| a.kind()).collect::<Vec<_>>())
            .finish()
    }
}
