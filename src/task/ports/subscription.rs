//! Live task list subscriptions.

use crate::task::domain::Task;
use tokio::sync::watch;

/// Receiving end of a live task query.
///
/// Dropping the subscription unregisters it from the store.
#[derive(Debug, Clone)]
pub struct TaskListSubscription {
    receiver: watch::Receiver<Vec<Task>>,
}

impl TaskListSubscription {
    /// Wraps the receiving half of a store-managed channel.
    #[must_use]
    pub const fn new(receiver: watch::Receiver<Vec<Task>>) -> Self {
        Self { receiver }
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn current(&self) -> Vec<Task> {
        self.receiver.borrow().clone()
    }

    /// Returns the number of tasks in the latest snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.borrow().len()
    }

    /// Returns `true` when the latest snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.borrow().is_empty()
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the store has gone away.
    pub async fn next(&mut self) -> Option<Vec<Task>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Returns `true` when a snapshot arrived that has not been read through
    /// [`TaskListSubscription::next`].
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }
}
