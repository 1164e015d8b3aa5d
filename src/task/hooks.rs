//! # Lifecycle hook bundle.
//!
//! Hooks are collected by the builder into one immutable value and handed
//! to the runner at `start`; there is no way to mutate them on a live task.
//! Every hook defaults to a no-op, and all of them except the work hook
//! run on the main context.
//!
//! Ownership follows their call counts: `pre`/`done`/`error` fire at most
//! once (`FnOnce`), `progress` fires per publish and `canceled` fires per
//! `cancel` call (shared `Fn`).

use std::sync::Arc;

use crate::error::TaskError;

/// User-supplied lifecycle callbacks with no-op defaults.
pub(crate) struct Hooks<P, O> {
    /// Runs on the main context before the work starts.
    pub pre: Box<dyn FnOnce() + Send>,
    /// Runs on the main context with the work's output.
    pub done: Box<dyn FnOnce(O) + Send>,
    /// Runs on the main context once per published progress value.
    pub progress: Arc<dyn Fn(P) + Send + Sync>,
    /// Runs synchronously on the thread calling `cancel`, every call.
    pub canceled: Arc<dyn Fn() + Send + Sync>,
    /// Runs on the main context with the captured execution error.
    pub error: Box<dyn FnOnce(TaskError) + Send>,
}

impl<P, O> Hooks<P, O> {
    pub(crate) fn noop() -> Self {
        Self {
            pre: Box::new(|| {}),
            done: Box::new(|_| {}),
            progress: Arc::new(|_| {}),
            canceled: Arc::new(|| {}),
            error: Box::new(|_| {}),
        }
    }
}
