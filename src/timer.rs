//! Countdown driver.
//!
//! Spawns one tokio task per running clock. The task calls
//! `RoundSession::tick_for` with the identity it was started for, once per
//! period, and exits as soon as the clock stops (success, failure, pause) or
//! the identity goes stale (reset). Owners cancel explicitly on state changes
//! and implicitly on drop, so no tick outlives its session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{RoundSession, SessionSnapshot, TickOutcome};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct TickScheduler {
  period: Duration,
  running: Option<(Uuid, JoinHandle<()>)>,
}

impl TickScheduler {
  pub fn new(period: Duration) -> Self {
    Self { period, running: None }
  }

  /// True if a live task is ticking for `token`.
  pub fn is_running_for(&self, token: Uuid) -> bool {
    matches!(&self.running, Some((t, h)) if *t == token && !h.is_finished())
  }

  pub fn is_running(&self) -> bool {
    matches!(&self.running, Some((_, h)) if !h.is_finished())
  }

  /// Start ticking for `token`, replacing any previous task.
  pub fn start(
    &mut self,
    token: Uuid,
    session: Arc<Mutex<RoundSession>>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
  ) {
    self.cancel();
    let period = self.period;
    let handle = tokio::spawn(drive(token, period, session, updates));
    debug!(target: "timer", session = %token, period_ms = period.as_millis() as u64, "timer started");
    self.running = Some((token, handle));
  }

  pub fn cancel(&mut self) {
    if let Some((token, handle)) = self.running.take() {
      handle.abort();
      debug!(target: "timer", session = %token, "timer cancelled");
    }
  }
}

impl Drop for TickScheduler {
  fn drop(&mut self) {
    self.cancel();
  }
}

async fn drive(
  token: Uuid,
  period: Duration,
  session: Arc<Mutex<RoundSession>>,
  updates: Arc<watch::Sender<SessionSnapshot>>,
) {
  let mut interval = time::interval_at(Instant::now() + period, period);
  interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
  loop {
    interval.tick().await;
    let mut s = session.lock().await;
    match s.tick_for(token) {
      TickOutcome::Counted => {
        updates.send_replace(s.snapshot());
      }
      TickOutcome::TimedOut => {
        updates.send_replace(s.snapshot());
        info!(target: "timer", session = %token, "countdown expired");
        break;
      }
      TickOutcome::Stale | TickOutcome::Idle => {
        debug!(target: "timer", session = %token, "clock stopped; timer exiting");
        break;
      }
    }
  }
}
