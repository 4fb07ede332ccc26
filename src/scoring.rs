//! Points formula shared by every game mode.
//!
//! `points = max(round(base * max(1, remaining / window)) - hints * penalty, floor)`

use crate::domain::ScoringRules;

/// Multiplier rewarding fast solves. Never below 1.
pub fn time_bonus_factor(remaining_seconds: u32, reference_window_secs: u32) -> f64 {
  if reference_window_secs == 0 {
    return 1.0;
  }
  (remaining_seconds as f64 / reference_window_secs as f64).max(1.0)
}

pub fn points_awarded(
  base_points: u32,
  remaining_seconds: u32,
  hints_revealed: u32,
  rules: &ScoringRules,
) -> u32 {
  let factor = time_bonus_factor(remaining_seconds, rules.reference_window_secs);
  let boosted = (base_points as f64 * factor).round() as i64;
  let penalty = hints_revealed as i64 * rules.penalty_per_hint as i64;
  (boosted - penalty).max(rules.floor_points as i64) as u32
}
