//! Scoped task context.
//!
//! While the scheduler resumes a task, a thread-local slot identifies
//! that task. Runtime components that run inside the task body, such
//! as the [`delay`](crate::time::delay) primitive and [`current_tick`],
//! reach the scheduler through this slot and the task's back-pointer
//! instead of requiring a handle to be threaded through every function
//! signature.
//!
//! The slot is saved and restored around each resumption, so there is
//! no global scheduler: a task is only ever observable as "current"
//! while its own poll is on the stack.
//!
//! [`current_tick`]: crate::scheduler::current_tick

use crate::task::RootCore;

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// The root task currently being resumed, if any.
    static CURRENT_TASK: RefCell<Option<Rc<RootCore>>> = const { RefCell::new(None) };
}

/// Installs `task` as the current task for the duration of `f`.
///
/// The previous value is restored on exit, which keeps reentrant
/// resumptions well-nested.
pub(crate) fn enter_task<R>(task: Rc<RootCore>, f: impl FnOnce() -> R) -> R {
    CURRENT_TASK.with(|cell| {
        let prev = cell.replace(Some(task));

        let out = f();

        cell.replace(prev);

        out
    })
}

/// Returns the task currently being resumed, if any.
pub(crate) fn current_task() -> Option<Rc<RootCore>> {
    CURRENT_TASK.with(|cell| cell.borrow().clone())
}
