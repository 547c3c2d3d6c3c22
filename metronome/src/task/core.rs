use crate::scheduler;
use crate::scheduler::context;
use crate::task::state::TaskState;
use crate::task::waker;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

/// Per-root-task state shared between the scheduler's queues, the
/// running body, and the waker.
///
/// `RootCore` is the promise of a root task: it carries the suspended
/// body, the lifecycle state, the absolute wake-up tick used to
/// classify the task when posted, and the back-pointer to the scheduler
/// the task was started on. Non-root tasks have no core of their own:
/// they live inside their parent's body and complete through the await
/// site.
pub(crate) struct RootCore {
    /// The root body.
    ///
    /// `None` once the task has completed; replacing the slot is what
    /// releases the body and everything it captured.
    future: RefCell<Option<Pin<Box<dyn Future<Output = Result<(), anyhow::Error>>>>>>,

    /// Lifecycle state.
    state: Cell<TaskState>,

    /// Whether the task currently occupies a scheduler queue.
    ///
    /// Guards the invariant that a task appears in at most one queue
    /// at a time.
    queued: Cell<bool>,

    /// Absolute tick at which the task next becomes runnable.
    wake_up_tick: Cell<u64>,

    /// Back-pointer to the owning scheduler, installed by `start`.
    ///
    /// Non-owning: a task must not keep its scheduler alive.
    scheduler: RefCell<Weak<scheduler::Core>>,
}

impl RootCore {
    /// Creates the core for a root task, suspended at entry.
    pub(crate) fn new(future: impl Future<Output = Result<(), anyhow::Error>> + 'static) -> Self {
        Self {
            future: RefCell::new(Some(Box::pin(future))),
            state: Cell::new(TaskState::Suspended),
            queued: Cell::new(false),
            wake_up_tick: Cell::new(0),
            scheduler: RefCell::new(Weak::new()),
        }
    }

    /// Binds this task to `sched`.
    ///
    /// Called by `start`; every component that later needs the
    /// scheduler (delays, the waker, `current_tick`) reaches it through
    /// this pointer.
    pub(crate) fn bind(&self, sched: &Rc<scheduler::Core>) {
        self.scheduler.replace(Rc::downgrade(sched));
    }

    /// The scheduler this task is bound to, if it is still alive.
    pub(crate) fn scheduler(&self) -> Option<Rc<scheduler::Core>> {
        self.scheduler.borrow().upgrade()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state.get() == TaskState::Completed
    }

    pub(crate) fn is_queued(&self) -> bool {
        self.queued.get()
    }

    pub(crate) fn set_queued(&self, queued: bool) {
        self.queued.set(queued);
    }

    pub(crate) fn wake_up_tick(&self) -> u64 {
        self.wake_up_tick.get()
    }

    pub(crate) fn set_wake_up_tick(&self, tick: u64) {
        self.wake_up_tick.set(tick);
    }

    /// Resumes the task body.
    ///
    /// Polls the body once, with this task installed as the current
    /// task for the duration of the poll. On `Pending` the task goes
    /// back to `Suspended`; by then it has already re-posted itself
    /// through a delay or a wake. On `Ready` the task is `Completed`,
    /// the body is released, and an error outcome is handed to the
    /// scheduler's fatal sink.
    pub(crate) fn resume(self: &Rc<Self>) {
        if self.is_done() {
            return;
        }

        let Some(sched) = self.scheduler() else {
            return;
        };

        self.state.set(TaskState::Running);

        let waker = waker::task_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        let poll = {
            let mut slot = self.future.borrow_mut();

            let Some(future) = slot.as_mut() else {
                return;
            };

            context::enter_task(self.clone(), || future.as_mut().poll(&mut cx))
        };

        match poll {
            Poll::Pending => {
                self.state.set(TaskState::Suspended);
            }
            Poll::Ready(result) => {
                self.state.set(TaskState::Completed);
                self.future.replace(None);

                if let Err(error) = result {
                    sched.fatal(error);
                }
            }
        }
    }

    /// Marks the task runnable at the scheduler's current tick and
    /// posts it.
    ///
    /// This is the waker path: it lets ordinary waker-based futures
    /// re-schedule the task. Completed tasks and tasks already queued
    /// are left alone.
    pub(crate) fn wake(self: Rc<Self>) {
        if self.is_done() {
            return;
        }

        let Some(sched) = self.scheduler() else {
            return;
        };

        self.wake_up_tick.set(sched.ticks());
        sched.post(self);
    }
}
