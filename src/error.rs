//! Error types used by the backtask runtime and work hooks.
//!
//! This module defines two main error enums:
//!
//! - [`BuildError`] — configuration errors raised to the caller of `start`.
//! - [`TaskError`] — errors raised during work execution, delivered to the
//!   error hook instead of being propagated.
//!
//! Both types provide `as_label()` for logging/metrics fields.

use thiserror::Error;

/// # Errors produced while starting a task.
///
/// These represent invalid configuration detected before anything is spawned.
/// They are the only failures that cross the task boundary as raised errors;
/// everything that happens after `start` succeeds is funneled to the hooks.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// No work hook was configured. Nothing is spawned and no hook runs.
    #[error("work hook is not set")]
    MissingWork,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use backtask::BuildError;
    ///
    /// assert_eq!(BuildError::MissingWork.as_label(), "missing_work");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::MissingWork => "missing_work",
        }
    }
}

/// # Errors produced by work execution.
///
/// These never reach the caller of `start` or `cancel`; the runner captures
/// them and delivers them to the error hook on the main context.
///
/// [`TaskError::Canceled`] is special: the runner treats it as a graceful
/// exit, not a failure, so it is never handed to the error hook. Work hooks
/// get it for free from the cancellation-aware [`TaskContext`] helpers and
/// can propagate it with `?`.
///
/// [`TaskContext`]: crate::TaskContext
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Work execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The work future panicked on the worker runtime.
    ///
    /// Captured from the join handle so a panicking work hook cannot take
    /// the host process down; delivered to the error hook like any failure.
    #[error("worker panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text, when available.
        reason: String,
    },

    /// Cancellation was observed at a cooperative checkpoint.
    #[error("task canceled")]
    Canceled,
}

impl TaskError {
    /// Creates a [`TaskError::Fail`] from any displayable error.
    ///
    /// # Example
    /// ```
    /// use backtask::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.to_string(), "execution failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Indicates whether this value marks cooperative cancellation rather
    /// than an actual failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_preserves_message() {
        let err = TaskError::fail("boom");
        match err {
            TaskError::Fail { ref error } => assert_eq!(error, "boom"),
            _ => panic!("expected Fail"),
        }
        assert_eq!(err.as_label(), "task_failed");
    }

    #[test]
    fn canceled_is_not_a_failure() {
        assert!(TaskError::Canceled.is_canceled());
        assert!(!TaskError::fail("x").is_canceled());
    }
}
