//! The tick-driven scheduler.
//!
//! This module contains the run loop at the heart of the runtime. The
//! scheduler owns a virtual clock (the tick counter), a FIFO queue of
//! tasks runnable at the current tick, and a min-heap of tasks waiting
//! for a future tick.
//!
//! It is responsible for:
//! - classifying posted tasks as ready or waiting,
//! - promoting waiters whose deadline has arrived,
//! - resuming one ready task per iteration,
//! - advancing the clock by exactly one tick per iteration,
//! - delivering errors that escape root tasks to the fatal sink.

pub(crate) mod context;

mod queue;

use crate::task::RootCore;

use self::queue::{ReadyQueue, Waiters};

use std::cell::{Cell, RefCell};
use std::hint;
use std::rc::Rc;

/// Overridable scheduler behavior.
///
/// The run loop is written against this capability interface so that
/// tests (and embedders) can observe idle iterations and intercept
/// fatal errors without touching the scheduling logic itself.
///
/// Both hooks have defaults: `idle` issues a CPU pause hint, and
/// `on_fatal` reports the error and terminates the run.
pub trait SchedulerHooks {
    /// Invoked once per iteration in which the ready queue is empty but
    /// waiters remain.
    ///
    /// The clock still advances after this hook returns, so it must not
    /// block indefinitely.
    fn idle(&self) {
        hint::spin_loop();
    }

    /// Invoked exactly once for each error that escapes a root task.
    ///
    /// The failed task is already complete when this runs. The default
    /// sink logs the error and panics, terminating the run; an
    /// overriding sink may instead store the error, in which case
    /// [`run_all`](Scheduler::run_all) drains the remaining queues
    /// normally.
    fn on_fatal(&self, error: anyhow::Error) {
        tracing::error!(error = %error, "unhandled failure escaped a root task");
        panic!("unhandled failure escaped a root task: {error}");
    }
}

/// The default hook set used by [`Scheduler::new`].
struct DefaultHooks;

impl SchedulerHooks for DefaultHooks {}

/// Shared scheduler state.
///
/// `Core` is reference-counted so that task handles can keep a
/// back-pointer to the scheduler that owns them. All interior
/// mutability is single-threaded (`Cell`/`RefCell`); no queue borrow is
/// ever held across user code.
pub(crate) struct Core {
    /// The virtual clock. Advances by exactly one per run-loop
    /// iteration, whether or not work was done.
    ticks: Cell<u64>,

    /// Tasks runnable at the current tick, in FIFO order.
    ready: RefCell<ReadyQueue>,

    /// Tasks waiting for a future tick, ordered by wake-up tick.
    waiters: RefCell<Waiters>,

    /// Hook set for idle iterations and fatal errors.
    hooks: Rc<dyn SchedulerHooks>,
}

impl Core {
    /// Current value of the tick counter.
    pub(crate) fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    /// Posts a task handle, classifying it by its wake-up tick.
    ///
    /// A deadline at or before the current tick lands in the ready
    /// queue; a future deadline lands in the waiters heap. Completed or
    /// already-queued tasks are ignored, so a task occupies at most one
    /// queue slot at a time.
    pub(crate) fn post(&self, task: Rc<RootCore>) {
        if task.is_done() || task.is_queued() {
            return;
        }

        task.set_queued(true);

        if task.wake_up_tick() <= self.ticks.get() {
            self.ready.borrow_mut().push(task);
        } else {
            self.waiters.borrow_mut().push(task);
        }
    }

    /// Delivers an error that escaped a root task to the fatal sink.
    pub(crate) fn fatal(&self, error: anyhow::Error) {
        self.hooks.on_fatal(error);
    }

    /// Promotes every waiter whose deadline has arrived into the ready
    /// queue, preserving heap-pop order.
    fn drain_due(&self) {
        let now = self.ticks.get();
        let mut waiters = self.waiters.borrow_mut();
        let mut ready = self.ready.borrow_mut();

        while let Some(task) = waiters.pop_due(now) {
            ready.push(task);
        }
    }

    /// Advances the clock by one tick.
    fn advance(&self) {
        self.ticks.set(self.ticks.get() + 1);
    }
}

/// A deterministic, single-threaded cooperative scheduler.
///
/// `Scheduler` is a cheap handle over shared state; cloning it yields
/// another handle to the same clock and queues. Root tasks are bound to
/// a scheduler with [`RootTask::start`](crate::task::RootTask::start)
/// and driven to completion by [`run_all`](Scheduler::run_all).
///
/// # Examples
///
/// ```rust,ignore
/// let scheduler = Scheduler::new();
/// spawn(my_task()).start(&scheduler);
/// scheduler.run_all();
/// assert!(scheduler.ticks() > 0);
/// ```
#[derive(Clone)]
pub struct Scheduler {
    core: Rc<Core>,
}

impl Scheduler {
    /// Creates a scheduler with the default hook set.
    pub fn new() -> Self {
        Self::with_hooks(Rc::new(DefaultHooks))
    }

    /// Creates a scheduler with a custom hook set.
    ///
    /// Tests typically pass an `Rc` they keep a clone of, so that idle
    /// counts and captured fatal errors can be inspected after
    /// [`run_all`](Scheduler::run_all) returns.
    pub fn with_hooks(hooks: Rc<dyn SchedulerHooks>) -> Self {
        Self {
            core: Rc::new(Core {
                ticks: Cell::new(0),
                ready: RefCell::new(ReadyQueue::new()),
                waiters: RefCell::new(Waiters::new()),
                hooks,
            }),
        }
    }

    /// Current value of the tick counter.
    ///
    /// Readable at any time; after [`run_all`](Scheduler::run_all)
    /// returns this is the total number of iterations the loop ran.
    pub fn ticks(&self) -> u64 {
        self.core.ticks()
    }

    /// Drives the run loop until both queues are empty.
    ///
    /// Each iteration:
    /// 1. promotes every waiter whose `wake_up_tick` has arrived into
    ///    the ready queue,
    /// 2. if nothing is ready: exits when the waiters heap is also
    ///    empty, otherwise calls the idle hook and advances the clock,
    /// 3. otherwise dequeues the front ready task, advances the clock,
    ///    and resumes the task if it is not already done.
    ///
    /// The clock is advanced before the resumption, so the tick a task
    /// observes while running is the tick its delays are measured from.
    /// Tasks posted during a resumption (the normal mechanism by which
    /// [`delay`](crate::time::delay) re-posts its task) are classified
    /// against the already-advanced clock.
    pub fn run_all(&self) {
        let core = &self.core;

        loop {
            core.drain_due();

            let next = core.ready.borrow_mut().pop();

            let Some(task) = next else {
                if core.waiters.borrow().is_empty() {
                    break;
                }

                core.hooks.idle();
                core.advance();
                continue;
            };

            task.set_queued(false);
            core.advance();

            if !task.is_done() {
                tracing::trace!(tick = core.ticks(), "resuming task");
                task.resume();
            }
        }
    }

    pub(crate) fn core(&self) -> &Rc<Core> {
        &self.core
    }
}

impl Default for Scheduler {
    /// Creates a scheduler with the default hook set.
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the tick counter of the scheduler driving the current task.
///
/// This resolves the scheduler through the running task's back-pointer,
/// so it is only meaningful inside a task body.
///
/// # Panics
///
/// Panics if called outside of a task resumed by a scheduler.
///
/// # Examples
///
/// ```rust,ignore
/// async fn body() {
///     let before = current_tick();
///     delay(3).await;
///     assert_eq!(current_tick(), before + 4);
/// }
/// ```
pub fn current_tick() -> u64 {
    let task = context::current_task()
        .expect("current_tick must be called from within a running task");

    let sched = task
        .scheduler()
        .expect("current task is not bound to a live scheduler");

    sched.ticks()
}
