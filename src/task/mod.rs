//! # Task lifecycle: configuration, execution, control.
//!
//! This module contains the one-shot task machinery:
//! - [`TaskBuilder`] - immutable, chainable configuration handed to `start`
//! - [`BackgroundTask`] - the running handle (cancel, observe state)
//! - [`TaskState`] - the terminal-state machine
//!
//! Internal modules:
//! - [`hooks`]: the user-supplied callback bundle with no-op defaults;
//! - [`runner`]: executes one sequence (pre, work, done/error) and
//!   publishes the terminal state.

mod builder;
mod handle;
mod hooks;
mod runner;
mod state;

pub use builder::TaskBuilder;
pub use handle::BackgroundTask;
pub use state::TaskState;
