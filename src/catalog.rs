//! Static, ordered collection of challenges plus the two selection strategies.
//!
//! The catalog never changes after construction; sessions share it through an `Arc`.

use crate::domain::{Challenge, SelectionStrategy};
use crate::rng::GameRng;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
  challenges: Vec<Challenge>,
}

impl Catalog {
  pub fn new(challenges: Vec<Challenge>) -> Self {
    Self { challenges }
  }

  /// Ordered view of every challenge.
  pub fn list(&self) -> &[Challenge] {
    &self.challenges
  }

  pub fn len(&self) -> usize {
    self.challenges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.challenges.is_empty()
  }

  pub fn get(&self, id: &str) -> Option<&Challenge> {
    self.challenges.iter().find(|c| c.id == id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.get(id).is_some()
  }

  fn position(&self, id: &str) -> Option<usize> {
    self.challenges.iter().position(|c| c.id == id)
  }

  /// Pick the next challenge.
  ///
  /// `current` is the active challenge (if any); `excluded` filters out
  /// challenges that may not be chosen (already solved in a terminating room, ...).
  ///
  /// - Sequential: walk forward from `current` in catalog order, wrapping, and
  ///   return the first non-excluded entry. The current challenge is only
  ///   reached again after a full lap.
  /// - RandomExcludingCurrent: uniform over non-excluded entries other than
  ///   `current`; falls back to `current` when it is the only candidate left.
  pub fn pick<F>(
    &self,
    strategy: SelectionStrategy,
    current: Option<&str>,
    excluded: F,
    rng: &mut GameRng,
  ) -> Option<&Challenge>
  where
    F: Fn(&Challenge) -> bool,
  {
    if self.challenges.is_empty() {
      return None;
    }
    match strategy {
      SelectionStrategy::Sequential => {
        let len = self.challenges.len();
        let start = match current.and_then(|id| self.position(id)) {
          Some(i) => i + 1,
          None => 0,
        };
        (0..len)
          .map(|offset| &self.challenges[(start + offset) % len])
          .find(|c| !excluded(*c))
      }
      SelectionStrategy::RandomExcludingCurrent => {
        let candidates: Vec<&Challenge> = self
          .challenges
          .iter()
          .filter(|c| !excluded(*c) && Some(c.id.as_str()) != current)
          .collect();
        if let Some(c) = rng.choose(&candidates) {
          return Some(*c);
        }
        current.and_then(|id| self.get(id)).filter(|c| !excluded(*c))
      }
    }
  }
}
