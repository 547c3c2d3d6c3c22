use crate::scheduler::Scheduler;
use crate::task::RootCore;

use std::future::Future;
use std::rc::Rc;

/// A task with no awaiting parent.
///
/// A root task is created suspended and owns its body until
/// [`start`](RootTask::start) is called, at which point ownership
/// transfers to the scheduler: the scheduler resumes the task as the
/// clock permits and releases it when it completes. Dropping an
/// unstarted `RootTask` destroys the body without ever running it.
///
/// Root tasks differ from [`Task`](crate::task::Task) in three ways:
///
/// 1. completing does not resume anyone, since there is no parent,
/// 2. an error escaping the body is delivered to the scheduler's fatal
///    sink ([`SchedulerHooks::on_fatal`](crate::SchedulerHooks::on_fatal)),
/// 3. they are not awaitable: `RootTask` is not a future.
pub struct RootTask {
    core: Rc<RootCore>,
}

impl RootTask {
    /// Creates a root task from its body.
    ///
    /// Most callers go through [`spawn`](crate::task::spawn) or
    /// [`spawn_with`](crate::task::spawn_with) instead of writing a
    /// root body directly.
    pub fn new(future: impl Future<Output = Result<(), anyhow::Error>> + 'static) -> Self {
        Self {
            core: Rc::new(RootCore::new(future)),
        }
    }

    /// Binds the task to `scheduler` and posts it for execution at the
    /// current tick.
    pub fn start(self, scheduler: &Scheduler) {
        self.start_after(scheduler, 0);
    }

    /// Binds the task to `scheduler` and posts it with a wake-up
    /// deadline `delay_ticks` past the current tick.
    ///
    /// With a nonzero delay the task lands in the waiters queue and the
    /// scheduler idles (advancing the clock) until the deadline
    /// arrives.
    pub fn start_after(self, scheduler: &Scheduler, delay_ticks: u64) {
        let core = scheduler.core();

        self.core.bind(core);
        self.core.set_wake_up_tick(core.ticks() + delay_ticks);

        core.post(self.core);
    }
}
