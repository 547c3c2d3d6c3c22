use metronome::time::delay;
use metronome::{Task, current_tick};

#[metronome::test]
async fn composed_delays_advance_the_clock() {
    let before = current_tick();

    delay(2).await;
    delay(3).await;

    // Each delay(n) costs n + 1 ticks: n waited plus the iteration
    // that resumes the task.
    assert_eq!(current_tick() - before, 7);
}

#[metronome::test]
async fn delay_zero_still_suspends() {
    let before = current_tick();

    delay(0).await;

    assert_eq!(current_tick(), before + 1);
}

#[metronome::test]
async fn a_child_value_is_returned_at_the_await_site() {
    let value = Task::new(async {
        delay(1).await;
        Ok(7)
    })
    .await
    .unwrap();

    assert_eq!(value, 7);
}
