//! Two workers racing virtual timers, the smallest useful program.
//!
//! Run with `cargo run --example workers`.

use metronome::time::delay;
use metronome::{Scheduler, Task, current_tick, spawn};

fn worker(name: &'static str, wait: u64) -> Task<()> {
    Task::new(async move {
        println!("[{name}] waiting {wait} ticks");
        delay(wait).await;
        println!("[{name}] woke at tick {}", current_tick());
        Ok(())
    })
}

fn main() {
    let scheduler = Scheduler::new();

    spawn(worker("A", 100)).start(&scheduler);
    spawn(worker("B", 10)).start(&scheduler);

    scheduler.run_all();

    println!("total ticks: {}", scheduler.ticks());
}
