//! # backtask
//!
//! **Backtask** is a small library for running one unit of work off the
//! main context while reporting progress and the final result back *on*
//! that main context, with cooperative cancellation and error capture.
//!
//! It is the async-Rust shape of the classic UI background-task pattern:
//! a pre hook, a work hook on a worker runtime, interleaved progress
//! deliveries, and exactly one terminal hook (done, error, or canceled).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌─────────────────────────┐
//!   │ TaskBuilder<P, O>       │  with_pre / with_work / with_done /
//!   │ (immutable config)      │  with_progress / with_canceled / with_error
//!   └───────────┬─────────────┘
//!               │ start()  — fails fast with BuildError::MissingWork
//!               ▼
//!   ┌─────────────────────────┐        ┌─────────────────────────┐
//!   │ runner (worker runtime) │        │ MainDriver (host-driven)│
//!   │  pre ──► work ──► done  │◄──────►│  runs hooks one at a    │
//!   │        /progress\ error │ invoke │  time, in send order    │
//!   └───────────┬─────────────┘        └─────────────────────────┘
//!               │ watch::channel
//!               ▼
//!   ┌─────────────────────────┐
//!   │ BackgroundTask (handle) │  cancel() / state() / wait_terminal()
//!   └─────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! start()
//!   ├─► pre hook on main context (wait for it)
//!   ├─► work hook on worker runtime, with TaskContext
//!   │     └─► publish_progress(v): suspend worker until the progress
//!   │         hook ran on main — in call order, never overlapping work
//!   ├─► Ok(out)        ──► done(out) on main   ──► COMPLETED
//!   ├─► Err(Canceled)  ──► (graceful)          ──► CANCELLED
//!   ├─► Err(e) / panic ──► error(e) on main    ──► ERRORED
//!   └─► debug-log total wall-clock duration
//! ```
//!
//! ## Contract
//! - Within one task, pre → work (with in-order progress) → done|error is
//!   strictly ordered; no two of these overlap. Across tasks there is no
//!   ordering.
//! - `start` and `cancel` never block.
//! - Cancellation is cooperative: it lands when the work reaches a
//!   cancellation-aware point. `cancel` fires the canceled hook eagerly on
//!   every call, so a work hook that completes without observing
//!   cancellation can make both the canceled and the done hook fire; see
//!   [`TaskBuilder::suppress_after_cancel`] to close that race.
//! - Execution errors (including panics on the worker) are captured and
//!   delivered to the error hook; only configuration errors are raised to
//!   the caller, by `start` itself.
//! - No built-in timeout: call [`BackgroundTask::cancel`] from a timer.
//!
//! ## Example
//! ```rust
//! use backtask::{MainContext, TaskBuilder, TaskContext};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The host owns the main context and decides where it runs.
//!     let (main, driver) = MainContext::channel();
//!     tokio::spawn(driver.run());
//!
//!     let task = TaskBuilder::new(tokio::runtime::Handle::current(), main)
//!         .with_name("countdown")
//!         .with_pre(|| println!("starting background action"))
//!         .with_work_fn(|ctx: TaskContext<u32>| async move {
//!             for step in 1..=3 {
//!                 ctx.sleep(Duration::from_millis(10)).await?;
//!                 ctx.publish_progress(step).await?;
//!             }
//!             Ok(true)
//!         })
//!         .with_progress(|step| println!("progress: {step}"))
//!         .with_done(|result| println!("task completed, result: {result}"))
//!         .with_error(|err| println!("there was an error: {err}"))
//!         .with_canceled(|| println!("task was cancelled"))
//!         .start()?;
//!
//!     task.join().await;
//!     Ok(())
//! }
//! ```

mod context;
mod error;
mod task;
mod work;

// ---- Public re-exports ----

pub use context::{MainContext, MainDriver, TaskContext};
pub use error::{BuildError, TaskError};
pub use task::{BackgroundTask, TaskBuilder, TaskState};
pub use work::{Work, WorkFn, WorkRef};
