//! End-to-end lifecycle tests: hook ordering, error funneling, and
//! cancellation semantics, observed through a recording log.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::Notify;

use backtask::{BuildError, MainContext, TaskBuilder, TaskContext, TaskError, TaskState};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Spawns a driven main context for the duration of a test.
fn driven_main() -> MainContext {
    let (main, driver) = MainContext::channel();
    tokio::spawn(driver.run());
    main
}

#[tokio::test]
async fn start_without_work_fails_fast() {
    let log = new_log();
    let l = log.clone();

    let res = TaskBuilder::<u32, bool>::new(Handle::current(), driven_main())
        .with_pre(move || push(&l, "pre"))
        .start();

    assert!(matches!(res, Err(BuildError::MissingWork)));
    // nothing was spawned, so no hook may have run
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn success_runs_hooks_in_order() {
    let log = new_log();
    let (pre, prog, done) = (log.clone(), log.clone(), log.clone());

    let task = TaskBuilder::new(Handle::current(), driven_main())
        .with_name("ordered")
        .with_pre(move || push(&pre, "pre"))
        .with_work_fn(|ctx: TaskContext<u32>| async move {
            for step in 1..=3 {
                ctx.sleep(Duration::from_millis(5)).await?;
                ctx.publish_progress(step).await?;
            }
            Ok::<_, TaskError>(true)
        })
        .with_progress(move |step| push(&prog, format!("progress:{step}")))
        .with_done(move |result| push(&done, format!("done:{result}")))
        .start()
        .unwrap();

    let state = task.join().await;
    assert_eq!(state, TaskState::Completed);
    assert_eq!(
        entries(&log),
        vec!["pre", "progress:1", "progress:2", "progress:3", "done:true"],
    );
}

#[tokio::test]
async fn work_error_goes_to_error_hook_only() {
    let log = new_log();
    let (pre, done, err) = (log.clone(), log.clone(), log.clone());

    let task = TaskBuilder::new(Handle::current(), driven_main())
        .with_pre(move || push(&pre, "pre"))
        .with_work_fn(|_ctx: TaskContext<u32>| async move {
            Err::<bool, _>(TaskError::fail("boom"))
        })
        .with_done(move |result| push(&done, format!("done:{result}")))
        .with_error(move |e| push(&err, format!("error:{e}")))
        .start()
        .unwrap();

    let state = task.join().await;
    assert_eq!(state, TaskState::Errored);
    assert_eq!(entries(&log), vec!["pre", "error:execution failed: boom"]);
}

#[tokio::test]
async fn worker_panic_is_captured() {
    let log = new_log();
    let err = log.clone();

    let task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(|_ctx: TaskContext<u32>| async move {
            panic!("kaboom");
            // unreachable, pins the work output type
            #[allow(unreachable_code)]
            Ok::<bool, TaskError>(true)
        })
        .with_error(move |e| push(&err, format!("error:{}", e.as_label())))
        .start()
        .unwrap();

    let state = task.join().await;
    assert_eq!(state, TaskState::Errored);
    assert_eq!(entries(&log), vec!["error:task_panicked"]);
}

#[tokio::test]
async fn progress_values_arrive_exactly_once_each() {
    let seen: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(|ctx: TaskContext<u64>| async move {
            for v in [10, 20, 30, 40, 50] {
                ctx.publish_progress(v).await?;
            }
            Ok::<_, TaskError>(())
        })
        .with_progress(move |v| sink.lock().unwrap().push(v))
        .start()
        .unwrap();

    task.join().await;
    assert_eq!(*seen.lock().unwrap(), vec![10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn cancel_before_checkpoint_skips_done() {
    let log = new_log();
    let (done, canceled) = (log.clone(), log.clone());

    let mut task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(|ctx: TaskContext<u32>| async move {
            // the next cooperative point is this sleep
            ctx.sleep(Duration::from_secs(60)).await?;
            Ok::<_, TaskError>(true)
        })
        .with_done(move |_| push(&done, "done"))
        .with_canceled(move || push(&canceled, "canceled"))
        .start()
        .unwrap();

    assert!(task.cancel());
    // the canceled hook fires synchronously from cancel()
    assert_eq!(entries(&log), vec!["canceled"]);

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Cancelled);
    assert_eq!(entries(&log), vec!["canceled"]);
}

#[tokio::test]
async fn cancel_after_terminal_still_fires_hook() {
    let log = new_log();
    let (done, canceled) = (log.clone(), log.clone());

    let mut task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(|_ctx: TaskContext<u32>| async move { Ok::<_, TaskError>(7u64) })
        .with_done(move |v| push(&done, format!("done:{v}")))
        .with_canceled(move || push(&canceled, "canceled"))
        .start()
        .unwrap();

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Completed);

    // acknowledged on every call, terminal state untouched
    assert!(task.cancel());
    assert!(task.cancel());
    assert_eq!(task.state(), TaskState::Completed);
    assert_eq!(entries(&log), vec!["done:7", "canceled", "canceled"]);
}

#[tokio::test]
async fn completes_anyway_race_delivers_both_by_default() {
    let log = new_log();
    let (done, canceled) = (log.clone(), log.clone());
    let gate = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());
    let (open, running) = (gate.clone(), started.clone());

    let mut task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(move |_ctx: TaskContext<u32>| {
            let gate = gate.clone();
            let started = started.clone();
            async move {
                started.notify_one();
                // ignores its token entirely, finishes once the gate opens
                gate.notified().await;
                Ok::<_, TaskError>(42u64)
            }
        })
        .with_done(move |v| push(&done, format!("done:{v}")))
        .with_canceled(move || push(&canceled, "canceled"))
        .start()
        .unwrap();

    // make sure the work is actually in flight before cancelling
    running.notified().await;
    task.cancel();
    open.notify_one();

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Completed);
    assert_eq!(entries(&log), vec!["canceled", "done:42"]);
}

#[tokio::test]
async fn suppress_after_cancel_drops_late_result() {
    let log = new_log();
    let (done, canceled) = (log.clone(), log.clone());
    let gate = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());
    let (open, running) = (gate.clone(), started.clone());

    let mut task = TaskBuilder::new(Handle::current(), driven_main())
        .suppress_after_cancel(true)
        .with_work_fn(move |_ctx: TaskContext<u32>| {
            let gate = gate.clone();
            let started = started.clone();
            async move {
                started.notify_one();
                gate.notified().await;
                Ok::<_, TaskError>(42u64)
            }
        })
        .with_done(move |v| push(&done, format!("done:{v}")))
        .with_canceled(move || push(&canceled, "canceled"))
        .start()
        .unwrap();

    running.notified().await;
    task.cancel();
    open.notify_one();

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Cancelled);
    assert_eq!(entries(&log), vec!["canceled"]);
}

#[tokio::test]
async fn start_does_not_block_the_caller() {
    let gate = Arc::new(Notify::new());
    let open = gate.clone();

    let mut task = TaskBuilder::new(Handle::current(), driven_main())
        .with_work_fn(move |_ctx: TaskContext<u32>| {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Ok::<_, TaskError>(())
            }
        })
        .start()
        .unwrap();

    assert!(!task.is_finished());
    assert_eq!(task.state(), TaskState::Running);

    open.notify_one();
    assert_eq!(task.wait_terminal().await, TaskState::Completed);
}

#[tokio::test]
async fn tasks_share_one_main_context() {
    let (main, driver) = MainContext::channel();
    tokio::spawn(driver.run());
    let log = new_log();

    let mut handles = Vec::new();
    for id in 0..4u32 {
        let sink = log.clone();
        let task = TaskBuilder::new(Handle::current(), main.clone())
            .with_name(format!("task-{id}"))
            .with_work_fn(move |ctx: TaskContext<u32>| async move {
                ctx.publish_progress(id).await?;
                Ok::<_, TaskError>(id)
            })
            .with_done(move |v| push(&sink, format!("done:{v}")))
            .start()
            .unwrap();
        handles.push(task);
    }

    for task in handles {
        assert_eq!(task.join().await, TaskState::Completed);
    }
    // no cross-task ordering guarantee, but every terminal hook ran once
    let mut dones: Vec<String> = entries(&log)
        .into_iter()
        .filter(|e| e.starts_with("done:"))
        .collect();
    dones.sort();
    assert_eq!(dones, vec!["done:0", "done:1", "done:2", "done:3"]);
}

#[tokio::test]
async fn dropped_driver_ends_run_without_delivery() {
    let (main, driver) = MainContext::channel();
    let log = new_log();
    let done = log.clone();

    let mut task = TaskBuilder::new(Handle::current(), main)
        .with_work_fn(|_ctx: TaskContext<u32>| async move { Ok::<_, TaskError>(true) })
        .with_done(move |_| push(&done, "done"))
        .start()
        .unwrap();

    // no one ever drives the main context
    drop(driver);

    let state = task.wait_terminal().await;
    assert_eq!(state, TaskState::Cancelled);
    assert!(entries(&log).is_empty());
}
