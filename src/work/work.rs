//! # Work trait: the background unit of a task.
//!
//! [`Work`] is the async, cancelable unit a [`TaskBuilder`] runs on the
//! worker runtime. It receives a [`TaskContext`] for progress publishing
//! and cooperative cancellation, and produces the task's output.
//!
//! Most callers use the closure form via
//! [`TaskBuilder::with_work_fn`](crate::TaskBuilder::with_work_fn); the
//! trait exists for work that carries state or is shared between call
//! sites.
//!
//! [`TaskBuilder`]: crate::TaskBuilder

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::TaskContext;
use crate::error::TaskError;

/// Shared handle to a work hook.
pub type WorkRef<P, O> = Arc<dyn Work<P, O>>;

/// # Asynchronous, cancelable unit of background work.
///
/// Runs once per task on the worker runtime. Implementations should lean on
/// the [`TaskContext`] helpers (`checkpoint`, `sleep`, `publish_progress`)
/// so cancellation lands at their suspension points; a work hook that never
/// touches its context runs to completion regardless of `cancel`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use backtask::{TaskContext, TaskError, Work};
///
/// struct Sum(Vec<u64>);
///
/// #[async_trait]
/// impl Work<usize, u64> for Sum {
///     async fn run(&self, ctx: TaskContext<usize>) -> Result<u64, TaskError> {
///         let mut total = 0;
///         for (i, n) in self.0.iter().enumerate() {
///             ctx.checkpoint()?;
///             total += n;
///             ctx.publish_progress(i + 1).await?;
///         }
///         Ok(total)
///     }
/// }
/// ```
#[async_trait]
pub trait Work<P, O>: Send + Sync + 'static
where
    P: Send + 'static,
    O: Send + 'static,
{
    /// Executes the work until completion, failure, or cancellation.
    ///
    /// Returning `Err(TaskError::Canceled)` ends the run gracefully (the
    /// terminal state becomes cancelled, no error hook fires); any other
    /// error is delivered to the error hook on the main context.
    async fn run(&self, ctx: TaskContext<P>) -> Result<O, TaskError>;
}
