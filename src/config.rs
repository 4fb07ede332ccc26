//! Loading engine configuration (per-game rule overrides + optional extra riddles) from TOML.
//!
//! See `EngineConfig`, `ModeOverrides` and `ChallengeCfg` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{AttemptPolicy, Challenge, EntryPolicy, GameKind, RoundMode, SelectionStrategy};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EngineConfig {
  #[serde(default)]
  pub lip_reading: ModeOverrides,
  #[serde(default)]
  pub riddles: ModeOverrides,
  #[serde(default)]
  pub escape_room: ModeOverrides,
  /// Extra riddles appended to the built-in riddle catalog.
  #[serde(default)]
  pub challenges: Vec<ChallengeCfg>,
}

/// Optional tweaks on top of a game's preset. Absent keys keep the preset value.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ModeOverrides {
  #[serde(default)] pub selection: Option<SelectionStrategy>,
  #[serde(default)] pub attempts: Option<AttemptPolicy>,
  #[serde(default)] pub entry: Option<EntryPolicy>,
  #[serde(default)] pub terminates_on_exhaustion: Option<bool>,
  #[serde(default)] pub reference_window_secs: Option<u32>,
  #[serde(default)] pub penalty_per_hint: Option<u32>,
  #[serde(default)] pub floor_points: Option<u32>,
  /// 0 disables level progression.
  #[serde(default)] pub level_up_every: Option<u32>,
}

impl ModeOverrides {
  pub fn apply(&self, mut mode: RoundMode) -> RoundMode {
    if let Some(v) = self.selection { mode.selection = v; }
    if let Some(v) = self.attempts { mode.attempts = v; }
    if let Some(v) = self.entry { mode.entry = v; }
    if let Some(v) = self.terminates_on_exhaustion { mode.terminates_on_exhaustion = v; }
    if let Some(v) = self.reference_window_secs { mode.scoring.reference_window_secs = v; }
    if let Some(v) = self.penalty_per_hint { mode.scoring.penalty_per_hint = v; }
    if let Some(v) = self.floor_points { mode.scoring.floor_points = v; }
    if let Some(v) = self.level_up_every {
      mode.level_up_every = if v == 0 { None } else { Some(v) };
    }
    mode
  }
}

impl EngineConfig {
  /// Preset for `kind` with this config's overrides applied.
  pub fn mode_for(&self, kind: GameKind, room_seconds: Option<u32>) -> RoundMode {
    let preset = RoundMode::for_game(kind, room_seconds);
    match kind {
      GameKind::LipReading => self.lip_reading.apply(preset),
      GameKind::Riddles => self.riddles.apply(preset),
      GameKind::EscapeRoom => self.escape_room.apply(preset),
    }
  }

  /// Valid extra challenges; invalid entries are logged and skipped.
  pub fn extra_challenges(&self) -> Vec<Challenge> {
    self.challenges.iter().filter_map(ChallengeCfg::to_challenge).collect()
  }
}

/// Challenge entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ChallengeCfg {
  #[serde(default)] pub id: Option<String>,
  #[serde(default)] pub title: Option<String>,
  #[serde(default)] pub category: Option<String>,
  pub prompt: String,
  #[serde(default)] pub visual_clue: String,
  #[serde(default)] pub answer: Option<String>,
  #[serde(default)] pub choices: Option<Vec<String>>,
  #[serde(default)] pub hints: Vec<String>,
  #[serde(default)] pub difficulty_tier: Option<u8>,
  pub base_points: u32,
  pub time_limit_seconds: u32,
}

impl ChallengeCfg {
  fn to_challenge(&self) -> Option<Challenge> {
    let id = self.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let answer = match &self.answer {
      Some(a) if !a.trim().is_empty() => a.clone(),
      _ => {
        error!(target: "puzzle_rounds", %id, "Skipping config challenge: missing answer.");
        return None;
      }
    };
    if self.base_points == 0 || self.time_limit_seconds == 0 {
      error!(target: "puzzle_rounds", %id, "Skipping config challenge: points and time limit must be positive.");
      return None;
    }
    Some(Challenge {
      id,
      title: self.title.clone(),
      category: self.category.clone().unwrap_or_else(|| "custom".into()),
      prompt: self.prompt.clone(),
      visual_clue: self.visual_clue.clone(),
      answer_key: answer,
      choices: self.choices.clone(),
      hints: self.hints.clone(),
      difficulty_tier: self.difficulty_tier.unwrap_or(1).clamp(1, 3),
      base_points: self.base_points,
      time_limit_seconds: self.time_limit_seconds,
    })
  }
}

pub fn parse_engine_config(s: &str) -> Result<EngineConfig, toml::de::Error> {
  toml::from_str::<EngineConfig>(s)
}

/// Attempt to load `EngineConfig` from ENGINE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_engine_config_from_env() -> Option<EngineConfig> {
  let path = std::env::var("ENGINE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_engine_config(&s) {
      Ok(cfg) => {
        info!(target: "puzzle_rounds", %path, extra = cfg.challenges.len(), "Loaded engine config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "puzzle_rounds", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "puzzle_rounds", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::TimerScope;

  #[test]
  fn overrides_layer_on_presets() {
    let cfg = parse_engine_config(
      r#"
      [riddles]
      selection = "sequential"
      attempts = "unlimited"
      entry = "explicit"
      penalty_per_hint = 3

      [lip_reading]
      level_up_every = 0
      "#,
    )
    .unwrap();

    let riddles = cfg.mode_for(GameKind::Riddles, None);
    assert_eq!(riddles.selection, SelectionStrategy::Sequential);
    assert_eq!(riddles.attempts, AttemptPolicy::Unlimited);
    assert_eq!(riddles.entry, EntryPolicy::Explicit);
    assert_eq!(riddles.scoring.penalty_per_hint, 3);
    assert_eq!(riddles.scoring.floor_points, 5);

    assert_eq!(cfg.mode_for(GameKind::LipReading, None).level_up_every, None);
    assert_eq!(
      cfg.mode_for(GameKind::EscapeRoom, Some(240)).timer,
      TimerScope::Shared { seconds: 240 }
    );
  }

  #[test]
  fn invalid_challenges_are_skipped() {
    let cfg = parse_engine_config(
      r#"
      [[challenges]]
      id = "r7"
      prompt = "What is this?"
      visual_clue = "🐝 + 🦵"
      answer = "bee line"
      hints = ["insect", "straight path"]
      difficulty_tier = 2
      base_points = 20
      time_limit_seconds = 25

      [[challenges]]
      prompt = "No answer here"
      base_points = 10
      time_limit_seconds = 10

      [[challenges]]
      prompt = "Zero time"
      answer = "x"
      base_points = 10
      time_limit_seconds = 0
      "#,
    )
    .unwrap();
    let extra = cfg.extra_challenges();
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].id, "r7");
    assert_eq!(extra[0].answer_key, "bee line");
    assert_eq!(extra[0].hints.len(), 2);
  }

  #[test]
  fn empty_file_is_all_defaults() {
    let cfg = parse_engine_config("").unwrap();
    assert_eq!(cfg.mode_for(GameKind::Riddles, None), RoundMode::riddles());
    assert!(cfg.extra_challenges().is_empty());
  }
}
