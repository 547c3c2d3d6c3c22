//! Virtual-time primitives.
//!
//! Time in this runtime is the scheduler's tick counter; there is no
//! wall clock. The only timer is [`delay`], which suspends the current
//! task until a deadline measured in ticks, and [`yield_now`], which
//! gives every currently-ready task a turn before the current one
//! continues.

use crate::scheduler::context;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Creates a future that suspends the current task for `ticks` ticks.
///
/// Awaiting the returned [`Delay`] always suspends, even for
/// `delay(0)`: the task is re-posted behind everything currently in
/// the ready queue and the scheduler runs one full iteration before it
/// continues. Every `delay` therefore advances the clock by at least
/// one tick, which keeps tick accounting deterministic.
///
/// The deadline is absolute: `current_tick() + ticks` at the moment of
/// suspension. A task awaiting `delay(n)` becomes runnable again no
/// earlier than that deadline, and runs once the FIFO order of the
/// ready queue reaches it.
///
/// # Panics
///
/// Panics if awaited outside of a task resumed by a scheduler.
///
/// # Examples
///
/// ```rust,ignore
/// async fn body() {
///     delay(3).await; // eligible again three ticks from now
/// }
/// ```
pub fn delay(ticks: u64) -> Delay {
    Delay {
        ticks,
        deadline: None,
    }
}

/// Yields execution back to the scheduler exactly once.
///
/// Equivalent to `delay(0)`: the task is re-posted at the current tick,
/// behind every task already in the ready queue, and continues on a
/// later iteration.
pub fn yield_now() -> Delay {
    delay(0)
}

/// A future that completes once a deadline in ticks is reached.
///
/// On first poll the delay computes its absolute deadline, stamps it on
/// the current task, and posts the task back to its scheduler: into the
/// ready queue for a deadline at the current tick, into the waiters
/// queue otherwise. Control then returns to the scheduler. The second
/// poll happens only after the scheduler has dequeued the task at or
/// past the deadline, so it completes immediately.
pub struct Delay {
    /// Requested duration in ticks.
    ticks: u64,

    /// Absolute deadline, set on first poll.
    deadline: Option<u64>,
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.deadline.is_some() {
            return Poll::Ready(());
        }

        let task = context::current_task()
            .expect("delay must be awaited from within a running task");

        // A task never bound to a scheduler has nowhere to be posted;
        // declining the post leaves it suspended forever.
        let Some(sched) = task.scheduler() else {
            return Poll::Pending;
        };

        let deadline = sched.ticks() + this.ticks;
        this.deadline = Some(deadline);

        task.set_wake_up_tick(deadline);
        sched.post(task);

        Poll::Pending
    }
}
