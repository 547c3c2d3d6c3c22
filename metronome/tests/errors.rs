use anyhow::bail;
use metronome::time::delay;
use metronome::{Scheduler, SchedulerHooks, Task, spawn, spawn_with};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Hook set that stores the fatal error for inspection and lets the
/// run drain normally.
#[derive(Default)]
struct CaptureFatal {
    fatal: RefCell<Option<anyhow::Error>>,
}

impl SchedulerHooks for CaptureFatal {
    fn on_fatal(&self, error: anyhow::Error) {
        self.fatal.replace(Some(error));
    }
}

fn failing() -> Task<i32> {
    Task::new(async {
        delay(1).await;
        bail!("boom")
    })
}

#[test]
fn an_error_escaping_a_root_reaches_the_fatal_sink() {
    let hooks = Rc::new(CaptureFatal::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let called = Rc::new(Cell::new(false));

    let flag = called.clone();
    spawn_with(failing(), move |_| flag.set(true)).start(&scheduler);
    scheduler.run_all();

    assert!(!called.get());

    let fatal = hooks
        .fatal
        .borrow_mut()
        .take()
        .expect("the fatal sink should hold the error");
    assert_eq!(fatal.to_string(), "boom");
}

#[test]
fn a_parent_catches_children_then_fails_itself() {
    type Trace = Rc<RefCell<Vec<String>>>;

    fn trial_child(trace: Trace, n: usize) -> Task<()> {
        Task::new(async move {
            trace.borrow_mut().push(format!("child-start-{n}"));
            trace.borrow_mut().push(format!("child-throw-{n}"));
            bail!("child-fail-{n}")
        })
    }

    fn trial_parent(trace: Trace) -> Task<()> {
        Task::new(async move {
            if trial_child(trace.clone(), 1).await.is_err() {
                trace.borrow_mut().push("parent-caught-1".into());
            }
            delay(1).await;
            trace.borrow_mut().push("parent-middle-delay".into());

            if trial_child(trace.clone(), 2).await.is_err() {
                trace.borrow_mut().push("parent-caught-2".into());
            }
            delay(1).await;
            trace.borrow_mut().push("parent-finished-trials".into());

            bail!("parent-final-uncaught")
        })
    }

    let hooks = Rc::new(CaptureFatal::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let called = Rc::new(Cell::new(false));

    let flag = called.clone();
    spawn_with(trial_parent(trace.clone()), move |_| flag.set(true)).start(&scheduler);
    scheduler.run_all();

    assert_eq!(
        *trace.borrow(),
        [
            "child-start-1",
            "child-throw-1",
            "parent-caught-1",
            "parent-middle-delay",
            "child-start-2",
            "child-throw-2",
            "parent-caught-2",
            "parent-finished-trials",
        ]
    );
    assert!(!called.get());

    let fatal = hooks
        .fatal
        .borrow_mut()
        .take()
        .expect("the fatal sink should hold the error");
    assert_eq!(fatal.to_string(), "parent-final-uncaught");
}

#[test]
fn a_handled_child_failure_is_invisible_to_the_scheduler() {
    let hooks = Rc::new(CaptureFatal::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let result = Rc::new(Cell::new(0));

    let parent = Task::new(async {
        match failing().await {
            Ok(v) => Ok(v),
            Err(_) => Ok(7),
        }
    });

    let slot = result.clone();
    spawn_with(parent, move |v| slot.set(v)).start(&scheduler);
    scheduler.run_all();

    assert_eq!(result.get(), 7);
    assert!(hooks.fatal.borrow().is_none());
}

#[test]
fn the_run_continues_after_a_captured_fatal() {
    let hooks = Rc::new(CaptureFatal::default());
    let scheduler = Scheduler::with_hooks(hooks.clone());
    let survivor = Rc::new(Cell::new(false));

    spawn(failing()).start(&scheduler);

    let flag = survivor.clone();
    spawn(Task::new(async move {
        delay(3).await;
        flag.set(true);
        Ok(())
    }))
    .start(&scheduler);

    scheduler.run_all();

    assert!(survivor.get());
    assert!(hooks.fatal.borrow().is_some());
}

#[test]
#[should_panic(expected = "unhandled failure escaped a root task")]
fn the_default_fatal_sink_terminates_the_run() {
    let scheduler = Scheduler::new();

    spawn(Task::<()>::new(async { bail!("kaboom") })).start(&scheduler);
    scheduler.run_all();
}
