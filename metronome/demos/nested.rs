//! A root task awaiting a nested child, via `#[metronome::main]`.
//!
//! Run with `cargo run --example nested`.

use metronome::Task;
use metronome::time::delay;

fn answer() -> Task<u32> {
    Task::new(async {
        delay(3).await;
        Ok(40)
    })
}

#[metronome::main]
async fn main() {
    let value = answer().await?;
    println!("computed {}", value + 2);
}
