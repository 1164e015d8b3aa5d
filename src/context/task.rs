//! # Per-run handle passed into the work hook.
//!
//! [`TaskContext`] is what the work hook sees of the task: a progress
//! channel back to the main context and the cancellation token for this
//! run. It is the only way to publish progress, and its helpers are the
//! cancellation-aware suspension points cooperative cancellation relies on.
//!
//! ## Progress contract
//! ```text
//! worker:  ... ──► publish_progress(v) ──────────────┐ (suspended)
//! main:                       progress_hook(v) runs  │
//! worker:  ◄──────────────────────────────────────────┘ continues
//! ```
//! Each call suspends the worker until the main context has executed the
//! delivery, so deliveries never overlap worker execution and arrive in
//! call order, exactly once per call.
//!
//! ## Rules
//! - Callable only from inside the work hook (it is handed in by the
//!   runner and never exposed elsewhere).
//! - Every helper returns `Err(TaskError::Canceled)` once cancellation has
//!   been requested, so `?` unwinds the work at the next checkpoint.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::context::main::MainContext;
use crate::error::TaskError;

/// Handle given to the work hook for progress publishing and cooperative
/// cancellation.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use backtask::{TaskContext, TaskError};
///
/// async fn work(ctx: TaskContext<u32>) -> Result<bool, TaskError> {
///     for step in 1..=3 {
///         ctx.sleep(Duration::from_millis(100)).await?;
///         ctx.publish_progress(step).await?;
///     }
///     Ok(true)
/// }
/// ```
pub struct TaskContext<P> {
    main: MainContext,
    progress: Arc<dyn Fn(P) + Send + Sync>,
    token: CancellationToken,
}

impl<P: Send + 'static> TaskContext<P> {
    pub(crate) fn new(
        main: MainContext,
        progress: Arc<dyn Fn(P) + Send + Sync>,
        token: CancellationToken,
    ) -> Self {
        Self {
            main,
            progress,
            token,
        }
    }

    /// Publishes a progress value to the progress hook on the main context.
    ///
    /// Suspends the worker until the hook has run. Values arrive in call
    /// order; no delivery overlaps worker execution.
    ///
    /// ### Errors
    /// - [`TaskError::Canceled`] if cancellation was requested (before
    ///   queueing - a canceled run publishes nothing further) or if the
    ///   main driver is gone.
    pub async fn publish_progress(&self, value: P) -> Result<(), TaskError> {
        if self.token.is_cancelled() {
            return Err(TaskError::Canceled);
        }
        let hook = Arc::clone(&self.progress);
        self.main
            .invoke(move || hook(value))
            .await
            .map_err(|_| TaskError::Canceled)
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Explicit cooperative checkpoint.
    ///
    /// Returns [`TaskError::Canceled`] if cancellation has been requested,
    /// so long-running loops can write `ctx.checkpoint()?;` per iteration.
    pub fn checkpoint(&self) -> Result<(), TaskError> {
        if self.token.is_cancelled() {
            Err(TaskError::Canceled)
        } else {
            Ok(())
        }
    }

    /// Cancellation-aware sleep.
    ///
    /// Completes after `dur`, or returns [`TaskError::Canceled`] as soon as
    /// cancellation is requested, whichever comes first.
    pub async fn sleep(&self, dur: Duration) -> Result<(), TaskError> {
        tokio::select! {
            _ = time::sleep(dur) => Ok(()),
            _ = self.token.cancelled() => Err(TaskError::Canceled),
        }
    }

    /// Waits until cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn ctx(token: CancellationToken) -> (TaskContext<u32>, crate::MainDriver, Arc<Mutex<Vec<u32>>>) {
        let (main, driver) = MainContext::channel();
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let progress: Arc<dyn Fn(u32) + Send + Sync> =
            Arc::new(move |v| s.lock().unwrap().push(v));
        (TaskContext::new(main, progress, token), driver, seen)
    }

    #[tokio::test]
    async fn publish_delivers_in_order() {
        let (ctx, driver, seen) = ctx(CancellationToken::new());
        tokio::spawn(driver.run());

        ctx.publish_progress(1).await.unwrap();
        ctx.publish_progress(2).await.unwrap();
        ctx.publish_progress(3).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn publish_refuses_after_cancel() {
        let token = CancellationToken::new();
        let (ctx, driver, seen) = ctx(token.clone());
        tokio::spawn(driver.run());

        token.cancel();
        let res = ctx.publish_progress(7).await;
        assert!(matches!(res, Err(TaskError::Canceled)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sleep_is_cut_short_by_cancel() {
        let token = CancellationToken::new();
        let (ctx, _driver, _seen) = ctx(token.clone());

        let t = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(10)).await;
            t.cancel();
        });

        let res = ctx.sleep(Duration::from_secs(60)).await;
        assert!(matches!(res, Err(TaskError::Canceled)));
    }
}
