use metronome::{RootTask, Scheduler, SchedulerHooks};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Hook set that counts idle iterations and stores fatal errors for
/// inspection instead of terminating.
#[derive(Default)]
struct RecordingHooks {
    fatal: RefCell<Option<anyhow::Error>>,
    idle_calls: Cell<u64>,
}

impl SchedulerHooks for RecordingHooks {
    fn idle(&self) {
        self.idle_calls.set(self.idle_calls.get() + 1);
    }

    fn on_fatal(&self, error: anyhow::Error) {
        self.fatal.replace(Some(error));
    }
}

fn flag_task(flag: Rc<Cell<bool>>) -> RootTask {
    RootTask::new(async move {
        flag.set(true);
        Ok(())
    })
}

#[test]
fn root_started_without_delay_runs_on_the_first_iteration() {
    let scheduler = Scheduler::new();
    let flag = Rc::new(Cell::new(false));

    flag_task(flag.clone()).start(&scheduler);
    scheduler.run_all();

    assert!(flag.get());
    assert_eq!(scheduler.ticks(), 1);
}

#[test]
fn root_started_with_delay_waits_out_the_deadline() {
    let hooks = Rc::new(RecordingHooks::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let flag = Rc::new(Cell::new(false));

    flag_task(flag.clone()).start_after(&scheduler, 5);
    scheduler.run_all();

    assert!(flag.get());
    assert_eq!(scheduler.ticks(), 6);
    assert_eq!(hooks.idle_calls.get(), 5);
}

#[test]
fn idle_is_invoked_only_while_waiters_remain() {
    let hooks = Rc::new(RecordingHooks::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let flag = Rc::new(Cell::new(false));

    flag_task(flag.clone()).start_after(&scheduler, 3);
    scheduler.run_all();

    assert!(flag.get());
    assert!(hooks.idle_calls.get() > 0);
    assert!(hooks.fatal.borrow().is_none());
}

#[test]
fn run_all_returns_immediately_with_nothing_scheduled() {
    let scheduler = Scheduler::new();

    scheduler.run_all();

    assert_eq!(scheduler.ticks(), 0);
}

#[test]
fn tasks_can_start_new_roots_mid_run() {
    let scheduler = Scheduler::new();
    let flag = Rc::new(Cell::new(false));

    let inner_flag = flag.clone();
    let handle = scheduler.clone();
    RootTask::new(async move {
        flag_task(inner_flag).start(&handle);
        Ok(())
    })
    .start(&scheduler);

    scheduler.run_all();

    assert!(flag.get());
    assert_eq!(scheduler.ticks(), 2);
}

#[test]
fn dropping_an_unstarted_root_releases_the_body_without_running_it() {
    struct SetOnDrop(Rc<Cell<bool>>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    let ran = Rc::new(Cell::new(false));
    let released = Rc::new(Cell::new(false));

    let body_ran = ran.clone();
    let guard = SetOnDrop(released.clone());
    let root = RootTask::new(async move {
        let _guard = guard;
        body_ran.set(true);
        Ok(())
    });

    drop(root);

    assert!(!ran.get());
    assert!(released.get());
}

#[test]
fn cloned_handles_share_the_same_clock() {
    let scheduler = Scheduler::new();
    let observer = scheduler.clone();
    let flag = Rc::new(Cell::new(false));

    flag_task(flag.clone()).start_after(&scheduler, 2);
    scheduler.run_all();

    assert_eq!(observer.ticks(), scheduler.ticks());
    assert_eq!(observer.ticks(), 3);
}
