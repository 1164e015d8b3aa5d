//! # Task configuration builder.
//!
//! [`TaskBuilder`] collects the hooks and execution contexts for one task,
//! then hands them to the runner as an immutable bundle via
//! [`start`](TaskBuilder::start). Configuration is a value, not mutable
//! state on a live task, and `start` consumes the builder, so a task is
//! single-use by construction.
//!
//! ## Rules
//! - Both execution contexts are explicit, required constructor parameters.
//!   There is no process-wide default scope to fall back to.
//! - Setters are chainable and last-write-wins.
//! - The work hook is the only mandatory piece; `start` without it fails
//!   with [`BuildError::MissingWork`] before anything is spawned.
//! - `start` never blocks: it spawns the sequence on the worker runtime and
//!   returns the running handle immediately.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::context::{MainContext, TaskContext};
use crate::error::{BuildError, TaskError};
use crate::task::handle::BackgroundTask;
use crate::task::hooks::Hooks;
use crate::task::runner::{run_sequence, SequenceParams};
use crate::task::state::TaskState;
use crate::work::{WorkFn, WorkRef};

/// Builder for a one-shot background task.
///
/// Generic over the progress value `P` (delivered to the progress hook) and
/// the work output `O` (delivered to the done hook).
///
/// # Example
/// ```
/// use backtask::{MainContext, TaskBuilder, TaskContext};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), backtask::BuildError> {
/// let (main, driver) = MainContext::channel();
/// tokio::spawn(driver.run());
///
/// let task = TaskBuilder::new(tokio::runtime::Handle::current(), main)
///     .with_name("demo")
///     .with_work_fn(|ctx: TaskContext<u32>| async move {
///         ctx.publish_progress(1).await?;
///         Ok(true)
///     })
///     .with_done(|result| println!("done: {result}"))
///     .start()?;
/// # let mut task = task;
/// # task.wait_terminal().await;
/// # Ok(())
/// # }
/// ```
pub struct TaskBuilder<P, O> {
    worker: Handle,
    main: MainContext,
    name: Cow<'static, str>,
    work: Option<WorkRef<P, O>>,
    hooks: Hooks<P, O>,
    suppress_after_cancel: bool,
}

impl<P, O> TaskBuilder<P, O>
where
    P: Send + 'static,
    O: Send + 'static,
{
    /// Creates a builder bound to a worker runtime and a main context.
    ///
    /// ### Parameters
    /// - `worker`: runtime the work hook (and the sequence) runs on
    /// - `main`: serialized context every other hook is delivered to
    pub fn new(worker: Handle, main: MainContext) -> Self {
        Self {
            worker,
            main,
            name: Cow::Borrowed("background-task"),
            work: None,
            hooks: Hooks::noop(),
            suppress_after_cancel: false,
        }
    }

    /// Sets the task name used in diagnostics.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the hook that runs on the main context before the work starts.
    pub fn with_pre(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.hooks.pre = Box::new(f);
        self
    }

    /// Sets the work hook from a shared [`WorkRef`].
    pub fn with_work(mut self, work: WorkRef<P, O>) -> Self {
        self.work = Some(work);
        self
    }

    /// Sets the work hook from a closure producing the work future.
    ///
    /// Shorthand for `with_work(WorkFn::arc(f))`.
    pub fn with_work_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(TaskContext<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, TaskError>> + Send + 'static,
    {
        self.with_work(WorkFn::arc(f))
    }

    /// Sets the hook that receives the work output on the main context.
    pub fn with_done(mut self, f: impl FnOnce(O) + Send + 'static) -> Self {
        self.hooks.done = Box::new(f);
        self
    }

    /// Sets the hook that receives each published progress value on the
    /// main context.
    pub fn with_progress(mut self, f: impl Fn(P) + Send + Sync + 'static) -> Self {
        self.hooks.progress = Arc::new(f);
        self
    }

    /// Sets the hook invoked by every [`cancel`](BackgroundTask::cancel)
    /// call, synchronously on the calling thread.
    pub fn with_canceled(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.canceled = Arc::new(f);
        self
    }

    /// Sets the hook that receives the captured execution error on the
    /// main context.
    pub fn with_error(mut self, f: impl FnOnce(TaskError) + Send + 'static) -> Self {
        self.hooks.error = Box::new(f);
        self
    }

    /// Suppresses `done`/`error` delivery for results that land after
    /// cancellation was requested.
    ///
    /// Off by default: the reference behavior lets a work hook that
    /// completes without observing cancellation still deliver its result,
    /// so the canceled hook and the done hook can both fire. Turning this
    /// on closes that race in favor of cancellation.
    pub fn suppress_after_cancel(mut self, suppress: bool) -> Self {
        self.suppress_after_cancel = suppress;
        self
    }

    /// Starts the task and returns its running handle.
    ///
    /// Non-blocking: the sequence (pre hook, work, terminal hook) runs on
    /// the worker runtime; hooks are delivered through the main context as
    /// it is driven.
    ///
    /// ### Errors
    /// - [`BuildError::MissingWork`] if no work hook was configured.
    ///   Nothing is spawned and no hook runs.
    pub fn start(self) -> Result<BackgroundTask, BuildError> {
        let work = self.work.ok_or(BuildError::MissingWork)?;

        let token = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(TaskState::Running);
        let canceled = Arc::clone(&self.hooks.canceled);

        let params = SequenceParams {
            name: self.name.clone(),
            suppress_after_cancel: self.suppress_after_cancel,
        };
        let join = self.worker.spawn(run_sequence(
            work,
            self.hooks,
            self.main,
            self.worker.clone(),
            token.clone(),
            state_tx,
            params,
        ));

        Ok(BackgroundTask::new(
            self.name, token, canceled, state_rx, join,
        ))
    }
}
