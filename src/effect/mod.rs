//! Asynchronous effects: lazy, cancellable single-value tasks.
//!
//! - [`Task`]: a lazy computation that resolves with `A`, rejects with `E`,
//!   or crashes.
//! - [`MaybeTask`]: either a bare value or a [`Task`], normalized with
//!   [`MaybeTask::lift`].
//! - [`Settled`]: how a task settled, including crashes.
//! - [`Cancel`]: handle to a task started with [`Task::fork`].
//!
//! # Examples
//!
//! ```rust
//! use flens::effect::{MaybeTask, Task};
//! use std::time::Duration;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let later: MaybeTask<i32, String> = Task::after(Duration::from_millis(5), 20).into();
//! let now: MaybeTask<i32, String> = MaybeTask::ready(22);
//!
//! let sum = later.lift().both(now.lift()).fmap(|(a, b)| a + b);
//! assert_eq!(sum.await, Ok(42));
//! # });
//! ```

mod error;
mod task;

pub use error::Absent;
pub use error::Crash;
pub use error::FocusError;

pub use task::Cancel;
pub use task::MaybeTask;
pub use task::Settled;
pub use task::Task;
