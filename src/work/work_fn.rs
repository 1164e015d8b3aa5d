//! # Closure-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(TaskContext<P>) -> Fut`, producing a
//! fresh future when the run starts. The closure owns its captures; shared
//! state between the work and the outside world goes through an explicit
//! `Arc` inside the closure.
//!
//! ## Example
//! ```rust
//! use backtask::{TaskContext, TaskError, WorkFn, WorkRef};
//!
//! let w: WorkRef<u32, bool> = WorkFn::arc(|ctx: TaskContext<u32>| async move {
//!     ctx.publish_progress(1).await?;
//!     Ok(true)
//! });
//! # drop(w);
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::TaskContext;
use crate::error::TaskError;
use crate::work::work::Work;

/// Closure-backed work implementation.
///
/// Wraps a closure that *creates* the work future when the run starts.
#[derive(Debug)]
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new closure-backed work hook.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a
    /// [`WorkRef`](crate::WorkRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the work hook and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut, P, O> Work<P, O> for WorkFn<F>
where
    F: Fn(TaskContext<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, TaskError>> + Send + 'static,
    P: Send + 'static,
    O: Send + 'static,
{
    async fn run(&self, ctx: TaskContext<P>) -> Result<O, TaskError> {
        (self.f)(ctx).await
    }
}
