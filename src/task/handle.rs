//! # Running task handle.
//!
//! [`BackgroundTask`] is what [`TaskBuilder::start`] returns: a type-erased
//! handle for requesting cancellation and observing the terminal state.
//! There is no way to restart through it; one builder, one run, one handle.
//!
//! [`TaskBuilder::start`]: crate::TaskBuilder::start

use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::task::state::TaskState;

/// Handle to a started one-shot task.
pub struct BackgroundTask {
    name: Cow<'static, str>,
    token: CancellationToken,
    canceled: Arc<dyn Fn() + Send + Sync>,
    state: watch::Receiver<TaskState>,
    join: JoinHandle<()>,
}

impl BackgroundTask {
    pub(crate) fn new(
        name: Cow<'static, str>,
        token: CancellationToken,
        canceled: Arc<dyn Fn() + Send + Sync>,
        state: watch::Receiver<TaskState>,
        join: JoinHandle<()>,
    ) -> Self {
        Self {
            name,
            token,
            canceled,
            state,
            join,
        }
    }

    /// Returns the task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests cooperative cancellation and invokes the canceled hook.
    ///
    /// The hook runs synchronously on the calling thread, on **every** call,
    /// whatever the task state: calling `cancel` on an already-terminal
    /// task still fires it, without changing the published terminal state.
    ///
    /// Cancellation itself is cooperative: it lands when the work reaches a
    /// cancellation-aware point ([`TaskContext`](crate::TaskContext)
    /// helpers or its own token checks). A work hook that completes without
    /// ever observing it still delivers its result, so the canceled hook
    /// and the done hook can both fire for one run. That race is part of
    /// the contract; opt into
    /// [`suppress_after_cancel`](crate::TaskBuilder::suppress_after_cancel)
    /// to resolve it in favor of cancellation.
    ///
    /// Always returns `true`; the return value says nothing about whether
    /// any work was actually prevented.
    pub fn cancel(&self) -> bool {
        self.token.cancel();
        (self.canceled)();
        true
    }

    /// Returns the currently observed state.
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// Returns `true` once a terminal state has been published.
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Waits for the terminal state and returns it.
    pub async fn wait_terminal(&mut self) -> TaskState {
        // The sender dropping after its terminal send also ends the wait;
        // borrow then holds the last published value either way.
        let _ = self.state.wait_for(|s| s.is_terminal()).await;
        *self.state.borrow()
    }

    /// Consumes the handle and waits for the whole sequence, including the
    /// final hook delivery, to finish.
    pub async fn join(mut self) -> TaskState {
        let _ = (&mut self.join).await;
        *self.state.borrow()
    }
}

impl std::fmt::Debug for BackgroundTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundTask")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("cancel_requested", &self.token.is_cancelled())
            .finish()
    }
}
