//! # Demo: progress
//!
//! A background task that publishes progress 1..=5 with a delay between
//! each step, then completes with `true`.
//!
//! Shows how to:
//! - Own the main context with [`MainContext::channel`]
//! - Configure the hooks with [`TaskBuilder`]
//! - Watch the ordered hook sequence on stdout
//!
//! ## Run
//! ```bash
//! cargo run --example progress
//! ```

use std::time::Duration;

use backtask::{MainContext, TaskBuilder, TaskContext};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (main, driver) = MainContext::channel();
    tokio::spawn(driver.run());

    let task = TaskBuilder::new(tokio::runtime::Handle::current(), main)
        .with_name("progress-demo")
        .with_pre(|| println!("starting background action:"))
        .with_work_fn(|ctx: TaskContext<u32>| async move {
            for step in 1..=5 {
                ctx.sleep(Duration::from_millis(400)).await?;
                ctx.publish_progress(step).await?;
            }
            Ok(true)
        })
        .with_progress(|step| println!("progress: {step}"))
        .with_done(|result| println!("task has completed, result is {result}"))
        .with_error(|err| println!("there was an error: {err}"))
        .start()?;

    let state = task.join().await;
    println!("terminal state: {state:?}");
    Ok(())
}
