//! # The designated main context.
//!
//! [`MainContext`] is a cheap-clone handle to a single serialized execution
//! context owned by the host (a UI thread, a test loop, a dedicated tokio
//! task). Every hook except the work hook is delivered through it.
//!
//! ## Architecture
//! ```text
//! Callers (many):                         Host (one):
//!   runner (pre/done/error) ──┐
//!   TaskContext (progress)  ──┼──► MainContext ──► MainDriver::run()
//!   another task's runner   ──┘    (mpsc chan)     jobs run one at a time,
//!                                                  in send order
//! ```
//!
//! ## Rules
//! - **Explicit, never global**: a context only exists because the host
//!   called [`MainContext::channel`] and is driving the returned driver.
//! - **Serialized**: the driver runs exactly one job at a time, in the
//!   order they were sent. Two hooks never overlap, even across tasks
//!   sharing one context.
//! - **Acknowledged delivery**: `invoke` resolves only after the driver has
//!   *run* the closure, not merely queued it. This is what makes progress
//!   publishing suspend the worker until the delivery completed.
//! - **Driver gone = context gone**: once the [`MainDriver`] is dropped,
//!   every pending and future `invoke` resolves to [`MainContextClosed`].

use tokio::sync::{mpsc, oneshot};

/// Sent when the main context has no live driver anymore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MainContextClosed;

/// A unit of hook delivery: run the closure, then ack.
struct MainJob {
    run: Box<dyn FnOnce() + Send>,
    ack: oneshot::Sender<()>,
}

/// Handle to the designated serialized main context.
///
/// Cloneable and `Send`; any number of tasks may share one context. All
/// deliveries through one context are serialized by its [`MainDriver`].
#[derive(Clone)]
pub struct MainContext {
    tx: mpsc::UnboundedSender<MainJob>,
}

impl MainContext {
    /// Creates a main context and the driver that executes its jobs.
    ///
    /// The host decides where the driver runs; that place *is* the main
    /// context. Typical choices:
    /// - spawn [`MainDriver::run`] on the thread/task that represents the
    ///   UI or control loop;
    /// - pump [`MainDriver::run_until_idle`] from an existing event loop.
    ///
    /// # Example
    /// ```
    /// use backtask::MainContext;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let (main, driver) = MainContext::channel();
    /// tokio::spawn(driver.run());
    /// # drop(main);
    /// # }
    /// ```
    pub fn channel() -> (MainContext, MainDriver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (MainContext { tx }, MainDriver { rx })
    }

    /// Runs `f` on the main context and waits until it has finished.
    ///
    /// Resolves after the driver executed the closure, so the caller is
    /// logically paused for the duration of the delivery.
    pub(crate) async fn invoke<F>(&self, f: F) -> Result<(), MainContextClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        let (ack, done) = oneshot::channel();
        let job = MainJob {
            run: Box::new(f),
            ack,
        };
        self.tx.send(job).map_err(|_| MainContextClosed)?;
        done.await.map_err(|_| MainContextClosed)
    }
}

/// Executes main-context jobs, one at a time, in send order.
///
/// The host owns the driver. Dropping it closes the context: tasks still
/// running will end without delivering their remaining hooks.
pub struct MainDriver {
    rx: mpsc::UnboundedReceiver<MainJob>,
}

impl MainDriver {
    /// Runs jobs until every [`MainContext`] handle has been dropped.
    ///
    /// This is the long-lived form: spawn it on whatever represents the
    /// main thread and let it live as long as tasks may be running.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            (job.run)();
            let _ = job.ack.send(());
        }
    }

    /// Drains currently queued jobs without waiting, returning how many ran.
    ///
    /// For hosts that integrate an external event loop and want to pump
    /// deliveries at their own cadence instead of dedicating a task to
    /// [`run`](MainDriver::run).
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            (job.run)();
            let _ = job.ack.send(());
            ran += 1;
        }
        ran
    }
}
