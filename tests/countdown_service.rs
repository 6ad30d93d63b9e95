use std::time::Duration;

use tokio::{
    sync::broadcast,
    time::{sleep, Instant},
};

use countdown_timer::{
    countdown::{ViewMode, ViewSignal},
    spawn_countdown,
    state::RunState,
};

/// Wait for the next display update and return its remaining seconds
async fn next_remaining(signals: &mut broadcast::Receiver<ViewSignal>) -> u64 {
    loop {
        match signals.recv().await.expect("signal") {
            ViewSignal::DisplayUpdate { time, .. } => {
                return time.hours * 3600 + time.minutes * 60 + time.seconds
            }
            _ => continue,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn natural_completion_alerts_once() {
    let (countdown, _task) = spawn_countdown(3);
    let mut signals = countdown.subscribe();
    let started = Instant::now();

    let state = countdown.start_toggle().await.unwrap();
    assert_eq!(state.remaining_seconds, Some(3));
    assert_eq!(state.progress(), Some(1.0));

    let mut received = Vec::new();
    loop {
        let signal = signals.recv().await.expect("signal");
        let done = signal == ViewSignal::CompletionAlert;
        received.push(signal);
        if done {
            break;
        }
    }
    assert_eq!(started.elapsed(), Duration::from_secs(2));

    let remaining: Vec<u64> = received
        .iter()
        .filter_map(|signal| match signal {
            ViewSignal::DisplayUpdate { time, .. } => Some(time.seconds),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![2, 1, 0]);
    assert!(received.contains(&ViewSignal::ViewConfig { mode: ViewMode::Initial }));
    assert_eq!(countdown.timer_state().run_state, RunState::Finished);

    sleep(Duration::from_secs(5)).await;
    while let Ok(signal) = signals.try_recv() {
        assert!(
            matches!(signal, ViewSignal::RotationCue { .. }),
            "unexpected signal after completion: {:?}",
            signal
        );
    }
}

#[tokio::test(start_paused = true)]
async fn pause_keeps_remaining_time_and_phase() {
    let (countdown, _task) = spawn_countdown(60);
    let mut signals = countdown.subscribe();
    let started = Instant::now();

    countdown.start_toggle().await.unwrap();
    assert_eq!(next_remaining(&mut signals).await, 59);

    let state = countdown.start_toggle().await.unwrap();
    assert_eq!(state.run_state, RunState::Paused);

    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(countdown.timer_state().remaining_seconds, Some(59));

    countdown.start_toggle().await.unwrap();
    assert_eq!(next_remaining(&mut signals).await, 58);
    assert_eq!(started.elapsed(), Duration::from_secs(6));
    assert_eq!(countdown.timer_state().remaining_seconds, Some(58));
}

#[tokio::test(start_paused = true)]
async fn cancel_while_paused_stops_the_run() {
    let (countdown, _task) = spawn_countdown(10);
    let mut signals = countdown.subscribe();

    countdown.start_toggle().await.unwrap();
    next_remaining(&mut signals).await;
    countdown.start_toggle().await.unwrap();

    let state = countdown.cancel().await.unwrap();
    assert_eq!(state.run_state, RunState::Finished);

    sleep(Duration::from_secs(3)).await;
    while let Ok(signal) = signals.try_recv() {
        assert_ne!(signal, ViewSignal::CompletionAlert);
        assert!(!matches!(signal, ViewSignal::DisplayUpdate { .. }));
    }

    let state = countdown.start_toggle().await.unwrap();
    assert_eq!(state.remaining_seconds, Some(10));
    assert_eq!(next_remaining(&mut signals).await, 9);
}
