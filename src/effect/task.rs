//! `Task` - a lazy, single-value asynchronous computation that can fail.
//!
//! A [`Task<A, E>`] describes work that eventually settles with exactly one of:
//!
//! - a resolution (`Ok(A)`),
//! - a rejection (`Err(E)`),
//! - a crash (the computation panicked).
//!
//! Nothing runs until the task is awaited, [`settle`](Task::settle)d or
//! [`fork`](Task::fork)ed. Combinators such as [`fmap`](Task::fmap) and
//! [`flat_map`](Task::flat_map) only build a description of the work.
//!
//! [`MaybeTask`] is the "maybe already wrapped" union used wherever a caller
//! may hand over either a bare value or a task. [`MaybeTask::lift`] is the
//! single normalization step.
//!
//! # Examples
//!
//! ```rust
//! use flens::effect::Task;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let task: Task<i32, String> = Task::resolve(10)
//!     .fmap(|x: i32| x * 2)
//!     .flat_map(|x: i32| Task::resolve(x + 1));
//! assert_eq!(task.await, Ok(21));
//!
//! let failing: Task<i32, String> = Task::reject("boom".to_string()).fmap(|x: i32| x * 2);
//! assert_eq!(failing.await, Err("boom".to_string()));
//! # });
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use pin_project_lite::pin_project;
use static_assertions::assert_impl_all;
use tokio::task::JoinHandle;

use super::error::Crash;

type BoxedOutcome<A, E> = Pin<Box<dyn Future<Output = Result<A, E>> + Send>>;
type Thunk<A, E> = Box<dyn FnOnce() -> BoxedOutcome<A, E> + Send>;

// =============================================================================
// Task Struct Definition
// =============================================================================

pin_project! {
    /// A lazy asynchronous computation resolving with `A` or rejecting with `E`.
    ///
    /// `Task` implements [`Future`] with `Output = Result<A, E>`, so it can be
    /// awaited directly. Awaiting propagates a panic of the underlying work;
    /// use [`Task::settle`] to observe a crash as a value instead.
    ///
    /// # Monad Laws
    ///
    /// 1. **Left Identity**: `Task::resolve(a).flat_map(f) == f(a)`
    /// 2. **Right Identity**: `m.flat_map(Task::resolve) == m`
    /// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
    pub struct Task<A, E> {
        #[pin]
        state: TaskState<A, E>,
    }
}

pin_project! {
    /// Internal state machine for `Task`.
    ///
    /// - `Settled` -> `Completed` (an outcome known at construction)
    /// - `Defer` -> `Running` -> `Completed`
    #[project = TaskStateProj]
    enum TaskState<A, E> {
        Settled {
            outcome: Option<Result<A, E>>,
        },
        Defer {
            thunk: Option<Thunk<A, E>>,
        },
        Running {
            #[pin]
            future: BoxedOutcome<A, E>,
        },
        Completed,
    }
}

assert_impl_all!(Task<i32, String>: Send, Unpin);

impl<A, E> Future for Task<A, E> {
    type Output = Result<A, E>;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            match this.state.as_mut().project() {
                TaskStateProj::Settled { outcome } => {
                    // INVARIANT: a settled outcome is handed out exactly once
                    let outcome = outcome.take().expect(
                        "Task internal error: settled outcome was already consumed. \
                         This indicates the Task was polled after completion.",
                    );
                    this.state.set(TaskState::Completed);
                    return Poll::Ready(outcome);
                }
                TaskStateProj::Defer { thunk } => {
                    let thunk = thunk.take().expect(
                        "Task internal error: deferred thunk was already consumed. \
                         This indicates a state machine invariant violation.",
                    );
                    let future = thunk();
                    this.state.set(TaskState::Running { future });
                }
                TaskStateProj::Running { future } => match future.poll(context) {
                    Poll::Ready(outcome) => {
                        this.state.set(TaskState::Completed);
                        return Poll::Ready(outcome);
                    }
                    Poll::Pending => return Poll::Pending,
                },
                TaskStateProj::Completed => {
                    panic!("Task polled after completion");
                }
            }
        }
    }
}

impl<A, E> std::fmt::Debug for Task<A, E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            TaskState::Settled { .. } => "Settled",
            TaskState::Defer { .. } => "Defer",
            TaskState::Running { .. } => "Running",
            TaskState::Completed => "Completed",
        };
        formatter.debug_struct("Task").field("state", &state).finish()
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl<A, E> Task<A, E> {
    /// Creates an already-resolved task.
    pub const fn resolve(value: A) -> Self {
        Self {
            state: TaskState::Settled {
                outcome: Some(Ok(value)),
            },
        }
    }

    /// Creates an already-rejected task.
    pub const fn reject(reason: E) -> Self {
        Self {
            state: TaskState::Settled {
                outcome: Some(Err(reason)),
            },
        }
    }

    /// Creates a task from a known outcome.
    pub const fn from_result(outcome: Result<A, E>) -> Self {
        Self {
            state: TaskState::Settled {
                outcome: Some(outcome),
            },
        }
    }
}

impl<A: 'static, E: 'static> Task<A, E> {
    /// Creates a task from an async closure.
    ///
    /// The closure is not called until the task is first polled.
    ///
    /// ```rust
    /// use flens::effect::Task;
    ///
    /// let task: Task<i32, String> = Task::new(|| async {
    ///     tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    ///     Ok(42)
    /// });
    /// ```
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
    {
        Self {
            state: TaskState::Defer {
                thunk: Some(Box::new(move || Box::pin(action()))),
            },
        }
    }

    /// Creates a task from a future that has not been polled yet.
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<A, E>> + Send + 'static,
    {
        Self {
            state: TaskState::Defer {
                thunk: Some(Box::new(move || Box::pin(future))),
            },
        }
    }
}

impl<A: Send + 'static, E: Send + 'static> Task<A, E> {
    /// Creates a task that resolves with `value` once `duration` has elapsed.
    ///
    /// The timer starts when the task is first polled, not when it is built.
    pub fn after(duration: Duration, value: A) -> Self {
        Self::new(move || async move {
            tokio::time::sleep(duration).await;
            Ok(value)
        })
    }

    /// Creates a task that rejects with `reason` once `duration` has elapsed.
    pub fn rejected_after(duration: Duration, reason: E) -> Self {
        Self::new(move || async move {
            tokio::time::sleep(duration).await;
            Err(reason)
        })
    }
}

// =============================================================================
// Functor / Monad Operations
// =============================================================================

impl<A: Send + 'static, E: Send + 'static> Task<A, E> {
    /// Transforms the resolution value. Rejections pass through untouched.
    #[must_use]
    pub fn fmap<B, F>(self, function: F) -> Task<B, E>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        Task::new(move || async move { self.await.map(function) })
    }

    /// Sequences a second task after this one resolves, flattening the result.
    ///
    /// `function` runs only after this task has resolved; a rejection
    /// short-circuits without calling it.
    #[must_use]
    pub fn flat_map<B, F>(self, function: F) -> Task<B, E>
    where
        F: FnOnce(A) -> Task<B, E> + Send + 'static,
        B: Send + 'static,
    {
        Task::new(move || async move {
            match self.await {
                Ok(value) => function(value).await,
                Err(reason) => Err(reason),
            }
        })
    }

    /// Alias for [`Task::flat_map`].
    #[must_use]
    pub fn chain<B, F>(self, function: F) -> Task<B, E>
    where
        F: FnOnce(A) -> Task<B, E> + Send + 'static,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// Transforms the rejection reason. Resolutions pass through untouched.
    #[must_use]
    pub fn map_rejection<E2, F>(self, function: F) -> Task<A, E2>
    where
        F: FnOnce(E) -> E2 + Send + 'static,
        E2: Send + 'static,
    {
        Task::new(move || async move { self.await.map_err(function) })
    }

    /// Runs this task and `other` concurrently and resolves with both values.
    ///
    /// The pair rejects as soon as either side rejects, with that side's
    /// reason; the other side is dropped.
    ///
    /// ```rust
    /// use flens::effect::Task;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let pair = Task::<_, String>::resolve(1).both(Task::resolve("one"));
    /// assert_eq!(pair.await, Ok((1, "one")));
    /// # });
    /// ```
    #[must_use]
    pub fn both<B>(self, other: Task<B, E>) -> Task<(A, B), E>
    where
        B: Send + 'static,
    {
        Task::new(move || async move { tokio::try_join!(self, other) })
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A: Send + 'static, E: Send + 'static> Task<A, E> {
    /// Runs the task and reports how it settled, turning a panic into
    /// [`Settled::Crashed`].
    pub async fn settle(self) -> Settled<A, E> {
        match AssertUnwindSafe(self).catch_unwind().await {
            Ok(Ok(value)) => Settled::Resolved(value),
            Ok(Err(reason)) => Settled::Rejected(reason),
            Err(panic_info) => {
                let crash = Crash::from_panic(panic_info.as_ref());
                tracing::warn!(message = %crash.message, "task crashed");
                Settled::Crashed(crash)
            }
        }
    }

    /// Spawns the task on the current tokio runtime.
    ///
    /// Exactly one of the callbacks runs when the task resolves or rejects.
    /// A crash runs neither and is reported through `tracing`. The returned
    /// [`Cancel`] handle stops the task and every task it is composed from.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn fork<R, F>(self, on_rejected: R, on_resolved: F) -> Cancel
    where
        R: FnOnce(E) + Send + 'static,
        F: FnOnce(A) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            match self.settle().await {
                Settled::Resolved(value) => on_resolved(value),
                Settled::Rejected(reason) => on_rejected(reason),
                Settled::Crashed(_) => {}
            }
        });
        Cancel { handle }
    }
}

/// Handle to a task started with [`Task::fork`].
#[derive(Debug)]
pub struct Cancel {
    handle: JoinHandle<()>,
}

impl Cancel {
    /// Cancels the forked task. Callbacks that have not run yet never run.
    pub fn cancel(&self) {
        tracing::trace!("cancelling forked task");
        self.handle.abort();
    }

    /// Returns `true` once the forked task has finished or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits until the forked task has finished or was cancelled.
    pub async fn join(self) {
        // A cancelled or crashed task has nothing left to report here.
        let _ = self.handle.await;
    }
}

// =============================================================================
// Settled
// =============================================================================

/// How a task settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<A, E> {
    /// The task resolved with a value.
    Resolved(A),
    /// The task rejected with a reason.
    Rejected(E),
    /// The task panicked.
    Crashed(Crash),
}

impl<A, E> Settled<A, E> {
    /// Returns the resolution value, if any.
    pub fn resolved(self) -> Option<A> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the rejection reason, if any.
    pub fn rejected(self) -> Option<E> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns `true` if the task crashed.
    pub const fn is_crashed(&self) -> bool {
        matches!(self, Self::Crashed(_))
    }
}

// =============================================================================
// MaybeTask
// =============================================================================

/// A value that is either already available or still arriving as a [`Task`].
///
/// ```rust
/// use flens::effect::{MaybeTask, Task};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let ready: MaybeTask<i32, String> = MaybeTask::ready(1);
/// let pending: MaybeTask<i32, String> = Task::resolve(2).into();
/// assert_eq!(ready.lift().await, Ok(1));
/// assert_eq!(pending.lift().await, Ok(2));
/// # });
/// ```
#[derive(Debug)]
pub enum MaybeTask<A, E> {
    /// A bare value.
    Ready(A),
    /// A value still to be computed.
    Pending(Task<A, E>),
}

impl<A, E> MaybeTask<A, E> {
    /// Wraps a bare value.
    pub const fn ready(value: A) -> Self {
        Self::Ready(value)
    }

    /// Returns `true` if the value is still a task.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Lifts a bare value into an already-resolved task; a task is returned as is.
    pub fn lift(self) -> Task<A, E> {
        match self {
            Self::Ready(value) => Task::resolve(value),
            Self::Pending(task) => task,
        }
    }
}

impl<A, E> From<Task<A, E>> for MaybeTask<A, E> {
    fn from(task: Task<A, E>) -> Self {
        Self::Pending(task)
    }
}

#[cfg(feature = "json")]
impl<E> From<serde_json::Value> for MaybeTask<serde_json::Value, E> {
    fn from(value: serde_json::Value) -> Self {
        Self::Ready(value)
    }
}
