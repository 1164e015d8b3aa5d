//! # Task lifecycle states.
//!
//! A handle only exists once the task is running, so the observable machine
//! starts at [`TaskState::Running`]; the created/configured phases live in
//! [`TaskBuilder`](crate::TaskBuilder) before `start`.
//!
//! ```text
//! (builder) --start--> RUNNING --work ok-------> COMPLETED  [done hook]
//!                      RUNNING --work err------> ERRORED    [error hook]
//!                      RUNNING --cancel lands--> CANCELLED
//! ```
//!
//! Exactly one terminal state is published per run. `cancel` racing a
//! completing work hook is the one documented exception where the canceled
//! hook may fire in addition to done/error (see
//! [`BackgroundTask::cancel`](crate::BackgroundTask::cancel)).

/// Observable state of a started task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// The sequence is in flight (pre hook, work, or hook delivery).
    Running,
    /// Work succeeded; the done hook was delivered.
    Completed,
    /// Work failed or panicked; the error hook was delivered.
    Errored,
    /// Cancellation landed before a result was delivered, or delivery was
    /// suppressed/impossible (suppress-after-cancel, main driver gone).
    Cancelled,
}

impl TaskState {
    /// Returns `true` for the three terminal states.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Running)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Errored => "errored",
            TaskState::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_running_is_non_terminal() {
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Errored.is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
    }
}
