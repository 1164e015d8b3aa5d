//! # Execution contexts.
//!
//! This module provides the two context handles the runtime coordinates:
//! - [`MainContext`] / [`MainDriver`] - the designated serialized main
//!   context the host drives (hooks run here)
//! - [`TaskContext`] - the per-run handle passed into the work hook
//!   (progress publishing, cooperative cancellation)

mod main;
mod task;

pub use main::{MainContext, MainDriver};
pub use task::TaskContext;
