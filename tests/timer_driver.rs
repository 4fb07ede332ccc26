// tests/timer_driver.rs
//
// Countdown behaviour against tokio's paused clock: time only moves when the
// runtime is idle, so every sleep below lands deterministically between ticks.

use std::sync::Arc;
use std::time::Duration;

use puzzle_rounds::catalog::Catalog;
use puzzle_rounds::config::EngineConfig;
use puzzle_rounds::domain::{Challenge, GameKind, RoundMode, SessionStatus};
use puzzle_rounds::engine::{RoundSession, TickOutcome};
use puzzle_rounds::rng::GameRng;
use puzzle_rounds::session::LiveSession;
use puzzle_rounds::state::AppState;
use puzzle_rounds::timer::DEFAULT_TICK_PERIOD;
use tokio::time::sleep;

fn challenge(id: &str, answer: &str, seconds: u32) -> Challenge {
    Challenge {
        id: id.into(),
        title: None,
        category: "test".into(),
        prompt: "guess".into(),
        visual_clue: "?".into(),
        answer_key: answer.into(),
        choices: None,
        hints: vec!["first".into()],
        difficulty_tier: 1,
        base_points: 10,
        time_limit_seconds: seconds,
    }
}

fn launch(seconds: u32) -> LiveSession {
    let mut mode = RoundMode::riddles();
    mode.selection = puzzle_rounds::domain::SelectionStrategy::Sequential;
    let catalog = Arc::new(Catalog::new(vec![
        challenge("a", "alpha", seconds),
        challenge("b", "beta", seconds),
    ]));
    let session = RoundSession::start_session(mode, catalog, GameRng::new(1)).unwrap();
    LiveSession::launch(GameKind::Riddles, session, DEFAULT_TICK_PERIOD)
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

#[tokio::test(start_paused = true)]
async fn countdown_expires_into_failed() {
    let live = launch(3);
    assert!(live.timer_running().await);

    sleep(secs(3.5)).await;

    let snap = live.snapshot().await;
    assert_eq!(snap.remaining_seconds, 0);
    assert_eq!(snap.status, SessionStatus::Failed);
    assert!(!live.timer_running().await);

    // Nothing left to score once the clock ran out.
    let (verdict, after) = live.submit_answer("alpha").await;
    assert!(verdict.is_none());
    assert_eq!(after.cumulative_score, 0);
}

#[tokio::test(start_paused = true)]
async fn every_tick_is_published() {
    let live = launch(10);
    let mut rx = live.subscribe();
    let _ = rx.borrow_and_update();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().remaining_seconds, 9);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().remaining_seconds, 8);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_old_clock() {
    let live = launch(5);
    sleep(secs(2.5)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 3);

    let old_token = live.snapshot().await.session_id;
    let fresh = live.reset().await;
    assert_ne!(fresh.session_id, old_token);
    assert_eq!(fresh.remaining_seconds, 5);

    // A tick minted for the previous identity arrives late.
    let (outcome, snap) = live.apply(|s| s.tick_for(old_token)).await;
    assert_eq!(outcome, TickOutcome::Stale);
    assert_eq!(snap.remaining_seconds, 5);

    // The new clock starts a full period after the reset.
    sleep(secs(0.5)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 5);
    sleep(secs(1.0)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 4);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_and_resume_restarts_the_clock() {
    let live = launch(10);
    sleep(secs(1.5)).await;
    let (paused, snap) = live.pause().await;
    assert!(paused);
    assert!(snap.paused);
    assert!(!live.timer_running().await);

    sleep(secs(20.0)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 9);

    let (resumed, _) = live.resume().await;
    assert!(resumed);
    assert!(live.timer_running().await);
    sleep(secs(1.5)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 8);
}

#[tokio::test(start_paused = true)]
async fn solving_stops_the_clock_until_advance() {
    let live = launch(10);
    sleep(secs(1.5)).await;
    let (verdict, snap) = live.submit_answer("Alpha").await;
    assert!(verdict.unwrap().correct);
    assert_eq!(snap.status, SessionStatus::Succeeded);
    assert!(!live.timer_running().await);

    sleep(secs(5.0)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 9);

    let (advanced, snap) = live.advance().await;
    assert!(advanced);
    assert_eq!(snap.remaining_seconds, 10);
    assert!(live.timer_running().await);
    sleep(secs(1.5)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 9);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_ticks() {
    let state = AppState::with_config(EngineConfig::default(), DEFAULT_TICK_PERIOD);
    let live = state.create_session(GameKind::LipReading, None, Some(3)).await.unwrap();
    sleep(secs(1.5)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 29);

    state.remove_session(live.id()).await.unwrap();
    assert!(!live.timer_running().await);
    assert_eq!(state.session_count().await, 0);

    sleep(secs(10.0)).await;
    assert_eq!(live.snapshot().await.remaining_seconds, 29);
}

#[tokio::test(start_paused = true)]
async fn sweep_drops_only_idle_finished_sessions() {
    let ttl = Duration::from_secs(5);
    let state = AppState::with_config(EngineConfig::default(), DEFAULT_TICK_PERIOD);
    let lost = state.create_session(GameKind::LipReading, None, Some(1)).await.unwrap();
    let (_, snap) = lost.submit_answer("not even close").await;
    assert_eq!(snap.status, SessionStatus::Failed);
    let playing = state.create_session(GameKind::EscapeRoom, Some(2), Some(1)).await.unwrap();

    // Finished, but not idle long enough yet.
    sleep(secs(1.0)).await;
    assert_eq!(state.sweep_finished(ttl).await, 0);

    sleep(secs(5.0)).await;
    assert_eq!(state.sweep_finished(ttl).await, 1);
    assert_eq!(state.session_count().await, 1);
    assert!(state.get_session(lost.id()).await.is_err());
    assert!(state.get_session(playing.id()).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn sweeper_task_runs_on_its_period() {
    let state = Arc::new(AppState::with_config(EngineConfig::default(), DEFAULT_TICK_PERIOD));
    let live = state.create_session(GameKind::LipReading, None, None).await.unwrap();
    live.submit_answer("wrong").await;

    let sweeper = state.clone().spawn_sweeper(Duration::from_secs(60), Duration::from_secs(120));
    sleep(secs(61.0)).await;
    assert_eq!(state.session_count().await, 1);
    sleep(secs(120.0)).await;
    assert_eq!(state.session_count().await, 0);
    sweeper.abort();
}
