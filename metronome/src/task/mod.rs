//! Task primitives.
//!
//! This module defines the abstractions used to represent suspendable
//! computations:
//!
//! - [`Task`] — a non-root task: awaitable from another task, yielding
//!   its result (or failure) directly to the awaiter,
//! - [`RootTask`] — a task with no awaiting parent: started on a
//!   scheduler, with failures delivered to the scheduler's fatal sink,
//! - [`spawn`] / [`spawn_with`] — adapters wrapping a non-root task
//!   into a root task, optionally delivering the result to a callback.
//!
//! Most users construct tasks with [`Task::new`], compose them with
//! `.await`, and hand the outermost one to [`spawn`].

mod core;
mod handle;
mod state;
mod waker;

pub(crate) use self::core::RootCore;

pub use handle::RootTask;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A non-root task: a suspendable computation producing a
/// `Result<T, anyhow::Error>`.
///
/// A `Task` is created suspended; nothing runs until it is awaited by
/// another task (or wrapped into a root task and started). Awaiting a
/// task transfers control directly into its body, without a round trip
/// through the scheduler, and yields the child's result at the await
/// site:
///
/// - `Ok(value)` when the body completes normally,
/// - `Err(error)` when an error escapes the body. The awaiter may
///   handle it or propagate it further with `?`, exactly as a
///   synchronous error would travel up a call chain.
///
/// Inside the body, [`delay`](crate::time::delay) suspends the whole
/// chain of nested tasks and returns control to the scheduler.
///
/// # Examples
///
/// ```rust,ignore
/// fn fetch_answer() -> Task<u32> {
///     Task::new(async {
///         delay(2).await;
///         Ok(41)
///     })
/// }
///
/// fn add_one() -> Task<u32> {
///     Task::new(async {
///         let v = fetch_answer().await?;
///         Ok(v + 1)
///     })
/// }
/// ```
pub struct Task<T> {
    /// The body, boxed and pinned once at construction.
    future: Pin<Box<dyn Future<Output = Result<T, anyhow::Error>>>>,
}

impl<T> Task<T> {
    /// Creates a new task from its body.
    ///
    /// The body does not run until the task is awaited or started.
    pub fn new(future: impl Future<Output = Result<T, anyhow::Error>> + 'static) -> Self {
        Self {
            future: Box::pin(future),
        }
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T, anyhow::Error>;

    /// Polls the task body.
    ///
    /// Called by the awaiting parent's own poll; this is the direct
    /// parent-to-child handoff.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.as_mut().poll(cx)
    }
}

/// Wraps a non-root task into a root task, discarding its result.
///
/// The returned root task awaits `task`; an error escaping `task`
/// propagates out of the root body and reaches the scheduler's fatal
/// sink.
pub fn spawn<T: 'static>(task: Task<T>) -> RootTask {
    RootTask::new(async move {
        task.await?;
        Ok(())
    })
}

/// Wraps a non-root task into a root task, delivering its result to
/// `callback`.
///
/// The callback is invoked only when `task` completes with a value. If
/// `task` fails, the error propagates to the scheduler's fatal sink
/// and the callback is never invoked.
///
/// # Examples
///
/// ```rust,ignore
/// let scheduler = Scheduler::new();
/// spawn_with(fetch_answer(), |v| println!("got {v}")).start(&scheduler);
/// scheduler.run_all();
/// ```
pub fn spawn_with<T, F>(task: Task<T>, callback: F) -> RootTask
where
    T: 'static,
    F: FnOnce(T) + 'static,
{
    RootTask::new(async move {
        let value = task.await?;
        callback(value);
        Ok(())
    })
}
