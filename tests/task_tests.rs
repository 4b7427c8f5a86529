#![cfg(feature = "async")]
//! Integration tests for `Task`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flens::effect::{MaybeTask, Settled, Task};
use rstest::rstest;
use tokio::sync::oneshot;
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(100);

// =============================================================================
// Construction
// =============================================================================

#[rstest]
#[case(Ok(3))]
#[case(Err("failed".to_string()))]
#[tokio::test]
async fn test_from_result(#[case] outcome: Result<i32, String>) {
    assert_eq!(Task::from_result(outcome.clone()).await, outcome);
}

#[tokio::test(start_paused = true)]
async fn test_after_timer_starts_when_polled() {
    let task = Task::<_, String>::after(DELAY, 7);
    tokio::time::sleep(DELAY * 3).await;

    let start = Instant::now();
    assert_eq!(task.await, Ok(7));
    assert!(start.elapsed() >= DELAY);
    assert!(start.elapsed() < DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_after() {
    let start = Instant::now();
    let result = Task::<i32, _>::rejected_after(DELAY, "late").await;
    assert_eq!(result, Err("late"));
    assert!(start.elapsed() >= DELAY);
}

#[tokio::test]
async fn test_from_future_is_not_polled_until_awaited() {
    let polls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&polls);
    let task: Task<i32, String> = Task::from_future(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(5)
    });

    tokio::task::yield_now().await;
    assert_eq!(polls.load(Ordering::SeqCst), 0);
    assert_eq!(task.await, Ok(5));
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Combinators
// =============================================================================

#[tokio::test]
async fn test_chain_is_flat_map() {
    let chained = Task::<i32, String>::resolve(2).chain(|x| Task::resolve(x * 10));
    let flat_mapped = Task::<i32, String>::resolve(2).flat_map(|x| Task::resolve(x * 10));
    assert_eq!(chained.await, flat_mapped.await);
}

#[tokio::test]
async fn test_map_rejection() {
    let task = Task::<i32, &str>::reject("short").map_rejection(|reason| reason.len());
    assert_eq!(task.await, Err(5));
}

#[tokio::test(start_paused = true)]
async fn test_both_runs_concurrently() {
    let start = Instant::now();
    let pair = Task::<_, String>::after(DELAY, 1)
        .both(Task::after(DELAY, "one"))
        .await;

    assert_eq!(pair, Ok((1, "one")));
    assert!(start.elapsed() < DELAY * 2);
}

#[rstest]
#[case(Task::reject("left"), Task::after(DELAY, 2), "left")]
#[case(Task::after(DELAY, 1), Task::reject("right"), "right")]
#[tokio::test(start_paused = true)]
async fn test_both_rejects_with_first_failure(
    #[case] left: Task<i32, &'static str>,
    #[case] right: Task<i32, &'static str>,
    #[case] expected: &'static str,
) {
    let start = Instant::now();
    assert_eq!(left.both(right).await, Err(expected));
    assert!(start.elapsed() < DELAY);
}

#[tokio::test]
async fn test_maybe_task_lift() {
    let ready = MaybeTask::<i32, String>::ready(1);
    let pending: MaybeTask<i32, String> = Task::resolve(2).into();

    assert!(!ready.is_pending());
    assert!(pending.is_pending());
    assert_eq!(ready.lift().both(pending.lift()).await, Ok((1, 2)));
}

// =============================================================================
// Settle
// =============================================================================

#[tokio::test]
async fn test_settle_outcomes() {
    let resolved = Task::<i32, String>::resolve(1).settle().await;
    let rejected = Task::<i32, String>::reject("no".to_string()).settle().await;
    let crashed = Task::<i32, String>::resolve(1)
        .fmap(|_| -> i32 { panic!("boom") })
        .settle()
        .await;

    assert_eq!(resolved.resolved(), Some(1));
    assert_eq!(rejected.rejected(), Some("no".to_string()));
    assert!(crashed.is_crashed());
}

#[tokio::test]
async fn test_settle_crash_keeps_formatted_message() {
    let code = 42;
    let settled = Task::<i32, String>::resolve(0)
        .fmap(move |_| -> i32 { panic!("code {code}") })
        .settle()
        .await;

    assert_eq!(
        settled,
        Settled::Crashed(flens::effect::Crash {
            message: "code 42".to_string()
        })
    );
}

// =============================================================================
// Fork
// =============================================================================

#[tokio::test]
async fn test_fork_calls_on_resolved() {
    let (sender, receiver) = oneshot::channel();
    let handle = Task::<i32, String>::resolve(9).fork(
        |_| panic!("unexpected rejection"),
        move |value| {
            let _ = sender.send(value);
        },
    );

    assert_eq!(receiver.await, Ok(9));
    handle.join().await;
}

#[tokio::test]
async fn test_fork_calls_on_rejected() {
    let (sender, receiver) = oneshot::channel();
    let handle = Task::<i32, String>::reject("bad".to_string()).fork(
        move |reason| {
            let _ = sender.send(reason);
        },
        |_| panic!("unexpected resolution"),
    );

    assert_eq!(receiver.await, Ok("bad".to_string()));
    handle.join().await;
}

#[tokio::test]
async fn test_fork_crash_runs_no_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let on_rejected = Arc::clone(&calls);
    let on_resolved = Arc::clone(&calls);

    let handle = Task::<i32, String>::resolve(0).fmap(|_| -> i32 { panic!("crash") }).fork(
        move |_| {
            on_rejected.fetch_add(1, Ordering::SeqCst);
        },
        move |_| {
            on_resolved.fetch_add(1, Ordering::SeqCst);
        },
    );

    handle.join().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_forked_task() {
    let calls = Arc::new(AtomicUsize::new(0));
    let on_resolved = Arc::clone(&calls);

    let handle = Task::<i32, String>::after(DELAY, 1).fork(
        |_| {},
        move |_| {
            on_resolved.fetch_add(1, Ordering::SeqCst);
        },
    );

    tokio::task::yield_now().await;
    handle.cancel();
    tokio::time::sleep(DELAY * 2).await;

    assert!(handle.is_finished());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    handle.join().await;
}
