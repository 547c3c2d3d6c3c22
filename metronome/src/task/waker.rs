use crate::task::RootCore;

use std::mem;
use std::rc::Rc;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// Vtable for wakers backed by an `Rc<RootCore>`.
///
/// The vtable defines how the scheduler's poll context interacts with
/// the task when the waker is cloned, woken, or dropped. Reference
/// counts are managed through `Rc::into_raw`/`Rc::from_raw` pairs.
static VTABLE: RawWakerVTable =
    RawWakerVTable::new(clone_raw, wake_raw, wake_by_ref_raw, drop_raw);

/// Creates a [`Waker`] that re-posts the task at the scheduler's
/// current tick when woken.
///
/// # Safety
///
/// The pointer stored in the `RawWaker` originates from
/// `Rc::into_raw` and is only ever turned back into an `Rc` with
/// matching reference-count adjustments. The runtime is single-threaded
/// by construction; wakers produced here must not be sent to another
/// thread.
pub(crate) fn task_waker(task: Rc<RootCore>) -> Waker {
    unsafe { Waker::from_raw(RawWaker::new(Rc::into_raw(task) as *const (), &VTABLE)) }
}

/// Clones the raw waker, incrementing the task's reference count.
fn clone_raw(ptr: *const ()) -> RawWaker {
    let rc = unsafe { Rc::<RootCore>::from_raw(ptr as *const RootCore) };
    let cloned = rc.clone();
    mem::forget(rc);

    RawWaker::new(Rc::into_raw(cloned) as *const (), &VTABLE)
}

/// Wakes the task, consuming the waker's reference.
fn wake_raw(ptr: *const ()) {
    let rc = unsafe { Rc::<RootCore>::from_raw(ptr as *const RootCore) };
    rc.wake();
}

/// Wakes the task without consuming the waker's reference.
fn wake_by_ref_raw(ptr: *const ()) {
    let rc = unsafe { Rc::<RootCore>::from_raw(ptr as *const RootCore) };
    rc.clone().wake();
    mem::forget(rc);
}

/// Drops the waker's reference to the task.
fn drop_raw(ptr: *const ()) {
    unsafe { drop(Rc::<RootCore>::from_raw(ptr as *const RootCore)) };
}
