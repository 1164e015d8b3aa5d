//! # Demo: cancel
//!
//! Starts a slow background task, lets it report some progress, then
//! cancels it from the outside.
//!
//! Shows how to:
//! - Cancel a running task with [`BackgroundTask::cancel`]
//! - Observe that the canceled hook fires eagerly while the work stops at
//!   its next cooperative point and the done hook never runs
//!
//! ## Run
//! ```bash
//! cargo run --example cancel
//! ```

use std::time::Duration;

use backtask::{MainContext, TaskBuilder, TaskContext, TaskState};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (main, driver) = MainContext::channel();
    tokio::spawn(driver.run());

    let mut task = TaskBuilder::new(tokio::runtime::Handle::current(), main)
        .with_name("cancel-demo")
        .with_pre(|| println!("starting background action:"))
        .with_work_fn(|ctx: TaskContext<u32>| async move {
            for step in 1..=20 {
                ctx.sleep(Duration::from_millis(500)).await?;
                ctx.publish_progress(step).await?;
            }
            Ok(true)
        })
        .with_progress(|step| println!("progress: {step}"))
        .with_done(|result| println!("task has completed, result is {result}"))
        .with_canceled(|| println!("task was cancelled"))
        .start()?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("requesting cancellation...");
    task.cancel();

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Cancelled);
    println!("terminal state: {state:?}");
    Ok(())
}
