//! # Work abstractions.
//!
//! This module provides the types describing the unit of background work:
//! - [`Work`] - trait for implementing the async, cancelable work hook
//! - [`WorkFn`] - closure-backed work implementation
//! - [`WorkRef`] - shared reference to a work hook (`Arc<dyn Work>`)

mod work;
mod work_fn;

pub use work::{Work, WorkRef};
pub use work_fn::WorkFn;
