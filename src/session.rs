//! A round session bound to its countdown and its snapshot feed.
//!
//! Every intent runs under the session lock, then re-syncs the timer and
//! publishes the resulting snapshot, so subscribers see one snapshot per
//! mutation (timer ticks included).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::{GameKind, Verdict};
use crate::engine::{RoundSession, SessionSnapshot};
use crate::timer::TickScheduler;

#[derive(Debug)]
pub struct LiveSession {
  id: Uuid,
  game: GameKind,
  seed: u64,
  core: Arc<Mutex<RoundSession>>,
  timer: Mutex<TickScheduler>,
  updates: Arc<watch::Sender<SessionSnapshot>>,
  /// Last time a client intent reached this session.
  touched: Mutex<Instant>,
}

impl LiveSession {
  /// Wrap a started session and kick off its clock. Must run inside a tokio runtime.
  pub fn launch(game: GameKind, session: RoundSession, tick_period: Duration) -> Self {
    let (tx, _rx) = watch::channel(session.snapshot());
    let mut timer = TickScheduler::new(tick_period);
    let updates = Arc::new(tx);
    let running = session.clock_running();
    let token = session.session_id();
    let seed = session.seed();
    let core = Arc::new(Mutex::new(session));
    if running {
      timer.start(token, core.clone(), updates.clone());
    }
    Self {
      id: Uuid::new_v4(),
      game,
      seed,
      core,
      timer: Mutex::new(timer),
      updates,
      touched: Mutex::new(Instant::now()),
    }
  }

  /// Stable handle; unlike the round identity it survives resets.
  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn game(&self) -> GameKind {
    self.game
  }

  /// Seed of the session's random source; passing it back replays the same picks.
  pub fn seed(&self) -> u64 {
    self.seed
  }

  pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
    self.updates.subscribe()
  }

  pub async fn snapshot(&self) -> SessionSnapshot {
    self.core.lock().await.snapshot()
  }

  pub async fn timer_running(&self) -> bool {
    self.timer.lock().await.is_running()
  }

  /// Time since the last intent (or since launch).
  pub async fn idle_for(&self) -> Duration {
    self.touched.lock().await.elapsed()
  }

  /// Failed or completed, and idle for at least `ttl`.
  pub async fn is_stale(&self, ttl: Duration) -> bool {
    self.snapshot().await.status.is_terminal() && self.idle_for().await >= ttl
  }

  /// Apply one intent atomically and return its result with the new snapshot.
  pub async fn apply<R>(&self, f: impl FnOnce(&mut RoundSession) -> R) -> (R, SessionSnapshot) {
    let mut timer = self.timer.lock().await;
    let mut s = self.core.lock().await;
    *self.touched.lock().await = Instant::now();
    let out = f(&mut *s);
    if s.clock_running() {
      if !timer.is_running_for(s.session_id()) {
        timer.start(s.session_id(), self.core.clone(), self.updates.clone());
      }
    } else {
      timer.cancel();
    }
    let snap = s.snapshot();
    self.updates.send_replace(snap.clone());
    (out, snap)
  }

  pub async fn submit_answer(&self, answer: &str) -> (Option<Verdict>, SessionSnapshot) {
    self.apply(|s| s.submit_answer(answer)).await
  }

  pub async fn reveal_hint(&self) -> (Option<String>, SessionSnapshot) {
    self.apply(|s| s.reveal_hint()).await
  }

  pub async fn advance(&self) -> (bool, SessionSnapshot) {
    self.apply(|s| s.advance()).await
  }

  pub async fn skip(&self) -> (bool, SessionSnapshot) {
    self.apply(|s| s.skip()).await
  }

  pub async fn select_challenge(&self, id: &str) -> (bool, SessionSnapshot) {
    self.apply(|s| s.select_challenge(id)).await
  }

  pub async fn pause(&self) -> (bool, SessionSnapshot) {
    self.apply(|s| s.pause()).await
  }

  pub async fn resume(&self) -> (bool, SessionSnapshot) {
    self.apply(|s| s.resume()).await
  }

  pub async fn reset(&self) -> SessionSnapshot {
    self.apply(|s| s.reset_session()).await.1
  }

  /// Stop the clock for good. Called on teardown.
  pub async fn shutdown(&self) {
    self.timer.lock().await.cancel();
  }
}
