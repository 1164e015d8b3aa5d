//! # Run the one-shot task sequence.
//!
//! Executes the full lifecycle of one started task and publishes exactly
//! one terminal state.
//!
//! ## Flow
//! ```text
//! pre hook (main) ──► work (worker runtime, progress interleaved)
//!                           │
//!                           ├─ Ok(out)        ──► done(out) on main ──► COMPLETED
//!                           ├─ Err(Canceled)  ──► (graceful)        ──► CANCELLED
//!                           ├─ Err(e)         ──► error(e) on main  ──► ERRORED
//!                           └─ panic          ──► error(Panicked)   ──► ERRORED
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal state per run.
//! - `Err(Canceled)` is a graceful exit: no error hook, no second firing of
//!   the canceled hook (that one belongs to `cancel()` itself).
//! - Cancellation observed before the work spawns skips the work entirely.
//! - With suppress-after-cancel set, a result landing after cancellation
//!   was requested is dropped and the run ends `Cancelled`.
//! - A vanished main driver ends the run `Cancelled` with a warning; there
//!   is nowhere left to deliver hooks.
//! - Total wall-clock duration of the sequence is reported via
//!   `tracing::debug!` (observational only).

use std::borrow::Cow;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::context::{MainContext, TaskContext};
use crate::error::TaskError;
use crate::task::hooks::Hooks;
use crate::task::state::TaskState;
use crate::work::WorkRef;

/// Per-run parameters that are not hooks.
pub(crate) struct SequenceParams {
    /// Task name for diagnostics.
    pub name: Cow<'static, str>,
    /// Drop `done`/`error` delivery if cancellation was requested first.
    pub suppress_after_cancel: bool,
}

/// Executes the sequence and publishes the terminal state on `state`.
pub(crate) async fn run_sequence<P, O>(
    work: WorkRef<P, O>,
    hooks: Hooks<P, O>,
    main: MainContext,
    worker: Handle,
    token: CancellationToken,
    state: watch::Sender<TaskState>,
    params: SequenceParams,
) where
    P: Send + 'static,
    O: Send + 'static,
{
    let started = Instant::now();
    let terminal = drive(work, hooks, main, worker, &token, &params).await;

    let _ = state.send(terminal);
    tracing::debug!(
        task = %params.name,
        outcome = terminal.as_label(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "background task finished",
    );
}

async fn drive<P, O>(
    work: WorkRef<P, O>,
    hooks: Hooks<P, O>,
    main: MainContext,
    worker: Handle,
    token: &CancellationToken,
    params: &SequenceParams,
) -> TaskState
where
    P: Send + 'static,
    O: Send + 'static,
{
    if token.is_cancelled() {
        return TaskState::Cancelled;
    }
    if main.invoke(hooks.pre).await.is_err() {
        tracing::warn!(task = %params.name, "main context closed before pre hook");
        return TaskState::Cancelled;
    }
    if token.is_cancelled() {
        return TaskState::Cancelled;
    }

    let ctx = TaskContext::new(main.clone(), hooks.progress, token.clone());
    let join = worker.spawn(async move { work.run(ctx).await });

    match join.await {
        Ok(Ok(out)) => {
            if params.suppress_after_cancel && token.is_cancelled() {
                tracing::debug!(task = %params.name, "done delivery suppressed after cancel");
                return TaskState::Cancelled;
            }
            let done = hooks.done;
            match main.invoke(move || done(out)).await {
                Ok(()) => TaskState::Completed,
                Err(_) => {
                    tracing::warn!(task = %params.name, "main context closed before done hook");
                    TaskState::Cancelled
                }
            }
        }
        Ok(Err(TaskError::Canceled)) => TaskState::Cancelled,
        Ok(Err(err)) => deliver_error(&main, hooks.error, err, token, params).await,
        Err(join_err) => {
            if join_err.is_panic() {
                let err = TaskError::Panicked {
                    reason: panic_reason(join_err.into_panic()),
                };
                deliver_error(&main, hooks.error, err, token, params).await
            } else {
                // worker runtime shut down underneath the task
                TaskState::Cancelled
            }
        }
    }
}

async fn deliver_error(
    main: &MainContext,
    error_hook: Box<dyn FnOnce(TaskError) + Send>,
    err: TaskError,
    token: &CancellationToken,
    params: &SequenceParams,
) -> TaskState {
    if params.suppress_after_cancel && token.is_cancelled() {
        tracing::debug!(
            task = %params.name,
            error = %err,
            "error delivery suppressed after cancel",
        );
        return TaskState::Cancelled;
    }
    match main.invoke(move || error_hook(err)).await {
        Ok(()) => TaskState::Errored,
        Err(_) => {
            tracing::warn!(task = %params.name, "main context closed before error hook");
            TaskState::Cancelled
        }
    }
}

/// Renders a panic payload for `TaskError::Panicked`.
fn panic_reason(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
