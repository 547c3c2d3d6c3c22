/// Lifecycle state of a root task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TaskState {
    /// The task exists but is not currently running.
    ///
    /// Every task starts here (nothing runs before the first
    /// resumption) and returns here each time its body suspends.
    Suspended,

    /// The task's body is being polled.
    ///
    /// At most one task is in this state at a time.
    Running,

    /// The body has returned and will never be polled again.
    Completed,
}
