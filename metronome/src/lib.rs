//! # Metronome
//!
//! **Metronome** is a deterministic, single-threaded cooperative task
//! scheduler. Time is not wall-clock time: it is a virtual counter of
//! "ticks" that the scheduler itself advances, exactly one per loop
//! iteration. Every run of a program is therefore fully reproducible,
//! because task interleavings and timer firings are functions of the
//! program alone.
//!
//! Unlike general-purpose runtimes, Metronome has no reactor, no worker
//! threads, and no I/O. It provides exactly the primitives needed to
//! express and observe cooperative concurrency in virtual time:
//!
//! - A **two-queue scheduler**: a FIFO ready queue for tasks runnable at
//!   the current tick, and a min-heap of waiters keyed by absolute
//!   wake-up tick
//! - **Structured tasks** with nested awaitable subtasks, value
//!   propagation, and error propagation up to a root-level fatal sink
//! - **Virtual delays** via [`delay`], which suspend the current task
//!   and re-post it with a computed wake-up tick
//! - **Overridable scheduler hooks** ([`SchedulerHooks`]) so tests can
//!   observe idle iterations and capture fatal errors
//! - **Ergonomic macros** `#[metronome::main]` and `#[metronome::test]`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use metronome::{Scheduler, Task, spawn_with};
//! use metronome::time::delay;
//!
//! fn answer() -> Task<u32> {
//!     Task::new(async {
//!         delay(2).await;
//!         Ok(42)
//!     })
//! }
//!
//! fn main() {
//!     let scheduler = Scheduler::new();
//!     spawn_with(answer(), |v| println!("the answer is {v}")).start(&scheduler);
//!     scheduler.run_all();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`scheduler`] — the run loop, hooks, and the tick counter
//! - [`task`] — tasks, root tasks, and the spawn helpers
//! - [`time`] — virtual-time delays and yielding

pub mod scheduler;
pub mod task;
pub mod time;

pub use scheduler::{Scheduler, SchedulerHooks, current_tick};
pub use task::{RootTask, Task, spawn, spawn_with};
pub use time::{delay, yield_now};

pub use metronome_macros::*;
