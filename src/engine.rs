//! Round controller: the state machine behind every puzzle game.
//!
//! A `RoundSession` owns its catalog handle, its rule set and its random
//! source. All intents are synchronous methods on `&mut self`; intents that do
//! not apply to the current status are no-ops that report "nothing changed".
//!
//! ```text
//! Selecting -> InProgress -> Succeeded -> InProgress (advance)
//!                         -> Failed     (time-up, or wrong answer under a single-attempt policy)
//!                         -> Completed  (last puzzle of a terminating room solved)
//! ```
//! `Failed` and `Completed` stay put until `reset_session`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::{
  AttemptPolicy, Challenge, EntryPolicy, HistoryEntry, RoundMode, SessionStatus, TimerScope, Verdict,
};
use crate::error::EngineError;
use crate::rng::GameRng;
use crate::scoring::points_awarded;
use crate::util::{normalize_answer, trunc_for_log};

/// Result of a timer tick delivered to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
  /// Token belongs to a superseded session; nothing was touched.
  Stale,
  /// Clock not running (not in progress, or paused); nothing was touched.
  Idle,
  /// One second elapsed.
  Counted,
  /// The countdown hit zero and the session failed.
  TimedOut,
}

#[derive(Debug)]
pub struct RoundSession {
  session_id: Uuid,
  mode: RoundMode,
  catalog: Arc<Catalog>,
  rng: GameRng,

  status: SessionStatus,
  active: Option<usize>,
  remaining_seconds: u32,
  time_limit_seconds: u32,
  hints_revealed: u32,
  cumulative_score: u32,
  streak: u32,
  level: u32,
  total_answered: u32,
  paused: bool,
  solved_challenge_ids: HashSet<String>,
  history: Vec<HistoryEntry>,
  last_verdict: Option<Verdict>,
}

impl RoundSession {
  /// Start a fresh session. Fails only on an empty catalog.
  pub fn start_session(mode: RoundMode, catalog: Arc<Catalog>, rng: GameRng) -> Result<Self, EngineError> {
    if catalog.is_empty() {
      return Err(EngineError::EmptyCatalog);
    }
    let mut session = Self {
      session_id: Uuid::new_v4(),
      mode,
      catalog,
      rng,
      status: SessionStatus::Selecting,
      active: None,
      remaining_seconds: 0,
      time_limit_seconds: 0,
      hints_revealed: 0,
      cumulative_score: 0,
      streak: 0,
      level: 1,
      total_answered: 0,
      paused: false,
      solved_challenge_ids: HashSet::new(),
      history: Vec::new(),
      last_verdict: None,
    };
    session.enter();
    info!(target: "round", session = %session.session_id, status = ?session.status, total = session.catalog.len(), "session started");
    Ok(session)
  }

  fn enter(&mut self) {
    if let TimerScope::Shared { seconds } = self.mode.timer {
      self.time_limit_seconds = seconds;
      self.remaining_seconds = seconds;
    }
    if self.mode.entry == EntryPolicy::Explicit {
      self.status = SessionStatus::Selecting;
      return;
    }
    let first = self
      .catalog
      .pick(self.mode.selection, None, |_| false, &mut self.rng)
      .and_then(|c| self.index_of(&c.id));
    match first {
      Some(idx) => self.activate(idx),
      // Unreachable for a non-empty catalog; keep the session in Selecting.
      None => self.status = SessionStatus::Selecting,
    }
  }

  fn index_of(&self, id: &str) -> Option<usize> {
    self.catalog.list().iter().position(|c| c.id == id)
  }

  fn activate(&mut self, idx: usize) {
    self.active = Some(idx);
    self.hints_revealed = 0;
    if self.mode.timer == TimerScope::PerChallenge {
      let limit = self.catalog.list()[idx].time_limit_seconds;
      self.time_limit_seconds = limit;
      self.remaining_seconds = limit;
    }
    self.status = SessionStatus::InProgress;
    debug!(target: "round", session = %self.session_id, challenge = %self.catalog.list()[idx].id, remaining = self.remaining_seconds, "challenge activated");
  }

  // ---- accessors ----

  pub fn session_id(&self) -> Uuid {
    self.session_id
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn mode(&self) -> &RoundMode {
    &self.mode
  }

  pub fn remaining_seconds(&self) -> u32 {
    self.remaining_seconds
  }

  pub fn hints_revealed(&self) -> u32 {
    self.hints_revealed
  }

  pub fn cumulative_score(&self) -> u32 {
    self.cumulative_score
  }

  pub fn streak(&self) -> u32 {
    self.streak
  }

  pub fn level(&self) -> u32 {
    self.level
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn history(&self) -> &[HistoryEntry] {
    &self.history
  }

  pub fn solved_count(&self) -> usize {
    self.solved_challenge_ids.len()
  }

  pub fn seed(&self) -> u64 {
    self.rng.seed()
  }

  pub fn active_challenge(&self) -> Option<&Challenge> {
    self.active.map(|i| &self.catalog.list()[i])
  }

  /// True while the countdown should be driven.
  pub fn clock_running(&self) -> bool {
    self.status == SessionStatus::InProgress && !self.paused
  }

  fn accepts_intents(&self) -> bool {
    self.clock_running()
  }

  // ---- intents ----

  /// One elapsed second. No-op unless the clock is running.
  pub fn tick(&mut self) -> TickOutcome {
    if !self.clock_running() {
      return TickOutcome::Idle;
    }
    self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
    if self.remaining_seconds == 0 {
      self.status = SessionStatus::Failed;
      self.streak = 0;
      info!(target: "round", session = %self.session_id, challenge = ?self.active_challenge().map(|c| c.id.as_str()), "time is up");
      return TickOutcome::TimedOut;
    }
    TickOutcome::Counted
  }

  /// Tick addressed to a specific session identity. Ticks minted for an
  /// earlier identity (before a reset) are dropped without touching state.
  pub fn tick_for(&mut self, token: Uuid) -> TickOutcome {
    if token != self.session_id {
      debug!(target: "round", session = %self.session_id, stale = %token, "stale tick ignored");
      return TickOutcome::Stale;
    }
    self.tick()
  }

  /// Reveal the next hint, if any remain.
  pub fn reveal_hint(&mut self) -> Option<String> {
    if !self.accepts_intents() {
      return None;
    }
    let hint = {
      let challenge = self.active_challenge()?;
      challenge.hints.get(self.hints_revealed as usize)?.clone()
    };
    self.hints_revealed += 1;
    debug!(target: "round", session = %self.session_id, hints = self.hints_revealed, "hint revealed");
    Some(hint)
  }

  /// Evaluate a candidate answer. Returns `None` when the session is not in progress.
  pub fn submit_answer(&mut self, candidate: &str) -> Option<Verdict> {
    if !self.accepts_intents() {
      return None;
    }
    let (challenge_id, answer_key, base_points) = {
      let c = self.active_challenge()?;
      (c.id.clone(), c.answer_key.clone(), c.base_points)
    };

    let normalized = normalize_answer(candidate);
    let correct = !normalized.is_empty() && normalized == normalize_answer(&answer_key);
    self.total_answered += 1;

    let mut points = 0;
    if correct {
      let first_solve = self.solved_challenge_ids.insert(challenge_id.clone());
      self.streak += 1;
      // A themed room scores each puzzle once.
      if first_solve || !self.mode.terminates_on_exhaustion {
        points = points_awarded(base_points, self.remaining_seconds, self.hints_revealed, &self.mode.scoring);
      }
      self.cumulative_score += points;
      self.status = if self.mode.terminates_on_exhaustion && self.all_solved() {
        SessionStatus::Completed
      } else {
        SessionStatus::Succeeded
      };
    } else {
      self.streak = 0;
      if self.mode.attempts == AttemptPolicy::Single {
        self.status = SessionStatus::Failed;
      }
    }

    self.history.push(HistoryEntry {
      challenge_id: challenge_id.clone(),
      submitted_answer: candidate.to_string(),
      correct,
      points_awarded: points,
      hints_used_at_submission: self.hints_revealed,
      timestamp: Utc::now(),
    });
    info!(
      target: "round",
      session = %self.session_id,
      challenge = %challenge_id,
      answer = %trunc_for_log(candidate, 64),
      correct,
      points,
      streak = self.streak,
      status = ?self.status,
      "answer evaluated"
    );

    let verdict = Verdict { challenge_id, correct, points_awarded: points };
    self.last_verdict = Some(verdict.clone());
    Some(verdict)
  }

  fn all_solved(&self) -> bool {
    self.catalog.list().iter().all(|c| self.solved_challenge_ids.contains(&c.id))
  }

  fn next_index(&mut self, exclude_current: bool) -> Option<usize> {
    let current = self.active_challenge().map(|c| c.id.clone());
    let solved = &self.solved_challenge_ids;
    let terminating = self.mode.terminates_on_exhaustion;
    let picked = self.catalog.pick(
      self.mode.selection,
      current.as_deref(),
      |c| {
        (terminating && solved.contains(&c.id)) || (exclude_current && Some(&c.id) == current.as_ref())
      },
      &mut self.rng,
    )?;
    let id = picked.id.clone();
    self.index_of(&id)
  }

  /// Move on after a solved challenge.
  pub fn advance(&mut self) -> bool {
    if self.status != SessionStatus::Succeeded || self.paused {
      return false;
    }
    if let Some(every) = self.mode.level_up_every {
      if every > 0 && self.streak > 0 && self.streak % every == 0 {
        self.level += 1;
        info!(target: "round", session = %self.session_id, level = self.level, "level up");
      }
    }
    match self.next_index(false) {
      Some(idx) => self.activate(idx),
      None => {
        self.status = SessionStatus::Completed;
        info!(target: "round", session = %self.session_id, score = self.cumulative_score, "all challenges solved");
      }
    }
    true
  }

  /// Give up on the active challenge and move to another one. Counts as a miss.
  pub fn skip(&mut self) -> bool {
    if !self.accepts_intents() {
      return false;
    }
    match self.next_index(true) {
      Some(idx) => {
        self.streak = 0;
        debug!(target: "round", session = %self.session_id, "challenge skipped");
        self.activate(idx);
        true
      }
      // Nothing else left to try in this room.
      None => false,
    }
  }

  /// Choose the starting challenge while `Selecting`.
  pub fn select_challenge(&mut self, id: &str) -> bool {
    if self.status != SessionStatus::Selecting {
      return false;
    }
    match self.index_of(id) {
      Some(idx) => {
        self.activate(idx);
        true
      }
      None => false,
    }
  }

  pub fn pause(&mut self) -> bool {
    if self.status != SessionStatus::InProgress || self.paused {
      return false;
    }
    self.paused = true;
    true
  }

  pub fn resume(&mut self) -> bool {
    if !self.paused {
      return false;
    }
    self.paused = false;
    true
  }

  /// Throw away all progress and start over under a new identity.
  pub fn reset_session(&mut self) {
    let old = self.session_id;
    self.session_id = Uuid::new_v4();
    self.status = SessionStatus::Selecting;
    self.active = None;
    self.remaining_seconds = 0;
    self.time_limit_seconds = 0;
    self.hints_revealed = 0;
    self.cumulative_score = 0;
    self.streak = 0;
    self.level = 1;
    self.total_answered = 0;
    self.paused = false;
    self.solved_challenge_ids.clear();
    self.history.clear();
    self.last_verdict = None;
    self.enter();
    info!(target: "round", previous = %old, session = %self.session_id, status = ?self.status, "session reset");
  }

  /// Immutable view for the presentation shell. Never carries the answer key.
  pub fn snapshot(&self) -> SessionSnapshot {
    let active = self.active_challenge();
    SessionSnapshot {
      session_id: self.session_id,
      status: self.status,
      active_challenge: active.map(ChallengeView::from),
      remaining_seconds: self.remaining_seconds,
      time_limit_seconds: self.time_limit_seconds,
      hints_revealed: self.hints_revealed,
      revealed_hints: active
        .map(|c| c.hints.iter().take(self.hints_revealed as usize).cloned().collect())
        .unwrap_or_default(),
      cumulative_score: self.cumulative_score,
      streak: self.streak,
      level: self.level,
      total_answered: self.total_answered,
      solved_count: self.solved_challenge_ids.len(),
      total_count: self.catalog.len(),
      paused: self.paused,
      last_verdict: self.last_verdict.clone(),
    }
  }
}

/// Public part of a challenge.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
  pub id: String,
  pub title: Option<String>,
  pub category: String,
  pub prompt: String,
  pub visual_clue: String,
  pub choices: Option<Vec<String>>,
  pub hint_count: usize,
  pub difficulty_tier: u8,
  pub base_points: u32,
  pub time_limit_seconds: u32,
}

impl From<&Challenge> for ChallengeView {
  fn from(c: &Challenge) -> Self {
    Self {
      id: c.id.clone(),
      title: c.title.clone(),
      category: c.category.clone(),
      prompt: c.prompt.clone(),
      visual_clue: c.visual_clue.clone(),
      choices: c.choices.clone(),
      hint_count: c.hints.len(),
      difficulty_tier: c.difficulty_tier,
      base_points: c.base_points,
      time_limit_seconds: c.time_limit_seconds,
    }
  }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
  pub session_id: Uuid,
  pub status: SessionStatus,
  pub active_challenge: Option<ChallengeView>,
  pub remaining_seconds: u32,
  pub time_limit_seconds: u32,
  pub hints_revealed: u32,
  pub revealed_hints: Vec<String>,
  pub cumulative_score: u32,
  pub streak: u32,
  pub level: u32,
  pub total_answered: u32,
  pub solved_count: usize,
  pub total_count: usize,
  pub paused: bool,
  pub last_verdict: Option<Verdict>,
}
