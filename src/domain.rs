//! Domain models used by the engine: challenges, round modes, session status and verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One puzzle unit. Built once at catalog load and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Challenge {
  pub id: String,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub category: String,   // free-form (e.g., "emoji", "symbol", "phrase")
  pub prompt: String,
  // Opaque display payload; the engine only ever compares answers.
  #[serde(default)] pub visual_clue: String,
  pub answer_key: String,
  // Closed-form choices; `None` means free-text input.
  #[serde(default)] pub choices: Option<Vec<String>>,
  #[serde(default)] pub hints: Vec<String>,
  pub difficulty_tier: u8,
  pub base_points: u32,
  pub time_limit_seconds: u32,
}

/// Which game a session belongs to. Only used to pick a preset and a catalog.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
  LipReading,
  Riddles,
  EscapeRoom,
}

/// A themed multi-puzzle room sharing one countdown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
  pub id: u32,
  pub name: String,
  pub theme: String,
  pub description: String,
  pub time_limit_seconds: u32,
  pub puzzles: Vec<Challenge>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
  Sequential,
  RandomExcludingCurrent,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPolicy {
  /// A wrong answer ends the attempt (`Failed`).
  Single,
  /// Wrong answers only reset the streak; the countdown keeps running.
  Unlimited,
}

/// How the session enters play.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryPolicy {
  /// First challenge is picked right away.
  Immediate,
  /// Session waits in `Selecting` until a challenge is chosen.
  Explicit,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "scope")]
pub enum TimerScope {
  /// Every challenge runs on its own `time_limit_seconds`.
  PerChallenge,
  /// One budget for the whole session; advancing does not refill it.
  Shared { seconds: u32 },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRules {
  pub reference_window_secs: u32,
  pub penalty_per_hint: u32,
  pub floor_points: u32,
}

impl Default for ScoringRules {
  fn default() -> Self {
    Self { reference_window_secs: 10, penalty_per_hint: 5, floor_points: 5 }
  }
}

/// Rule set that turns the single engine into one of the game flavours.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundMode {
  pub selection: SelectionStrategy,
  pub attempts: AttemptPolicy,
  pub terminates_on_exhaustion: bool,
  pub entry: EntryPolicy,
  pub timer: TimerScope,
  pub scoring: ScoringRules,
  /// Level goes up on advance whenever the streak is a positive multiple of this.
  pub level_up_every: Option<u32>,
}

impl RoundMode {
  /// Lip-reading trainer: fixed order, one guess per clip, no speed bonus.
  pub fn lip_reading() -> Self {
    Self {
      selection: SelectionStrategy::Sequential,
      attempts: AttemptPolicy::Single,
      terminates_on_exhaustion: false,
      entry: EntryPolicy::Immediate,
      timer: TimerScope::PerChallenge,
      scoring: ScoringRules { reference_window_secs: 30, penalty_per_hint: 2, floor_points: 5 },
      level_up_every: Some(3),
    }
  }

  /// Visual riddles: random order avoiding repeats, speed bonus above 10s left.
  pub fn riddles() -> Self {
    Self {
      selection: SelectionStrategy::RandomExcludingCurrent,
      attempts: AttemptPolicy::Single,
      terminates_on_exhaustion: false,
      entry: EntryPolicy::Immediate,
      timer: TimerScope::PerChallenge,
      scoring: ScoringRules::default(),
      level_up_every: None,
    }
  }

  /// Escape room: solve every puzzle in order before the room clock runs out.
  pub fn escape_room(room_seconds: u32) -> Self {
    Self {
      selection: SelectionStrategy::Sequential,
      attempts: AttemptPolicy::Unlimited,
      terminates_on_exhaustion: true,
      entry: EntryPolicy::Immediate,
      timer: TimerScope::Shared { seconds: room_seconds },
      scoring: ScoringRules { reference_window_secs: room_seconds, penalty_per_hint: 0, floor_points: 5 },
      level_up_every: None,
    }
  }

  pub fn for_game(kind: GameKind, room_seconds: Option<u32>) -> Self {
    match kind {
      GameKind::LipReading => Self::lip_reading(),
      GameKind::Riddles => Self::riddles(),
      GameKind::EscapeRoom => Self::escape_room(room_seconds.unwrap_or(300)),
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  Selecting,
  InProgress,
  Succeeded,
  Failed,
  Completed,
}

impl SessionStatus {
  pub fn is_terminal(self) -> bool {
    matches!(self, SessionStatus::Failed | SessionStatus::Completed)
  }
}

/// Outcome of a single answer submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  pub challenge_id: String,
  pub correct: bool,
  pub points_awarded: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  pub challenge_id: String,
  pub submitted_answer: String,
  pub correct: bool,
  pub points_awarded: u32,
  pub hints_used_at_submission: u32,
  pub timestamp: DateTime<Utc>,
}
