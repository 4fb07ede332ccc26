//! Random source for challenge selection.
//!
//! Wraps a seeded ChaCha RNG so tests (and clients passing a seed) get
//! reproducible picks.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct GameRng {
  rng: ChaCha8Rng,
  seed: u64,
}

impl GameRng {
  /// Create a new RNG with the given seed
  pub fn new(seed: u64) -> Self {
    Self { rng: ChaCha8Rng::seed_from_u64(seed), seed }
  }

  /// Create a new RNG with a random seed
  pub fn from_entropy() -> Self {
    Self::new(rand::random())
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  /// Uniform index in `0..n`. Returns 0 if n is 0.
  pub fn below(&mut self, n: usize) -> usize {
    if n == 0 {
      return 0;
    }
    self.rng.gen_range(0..n)
  }

  /// Choose a random element from a slice
  pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
      None
    } else {
      Some(&items[self.below(items.len())])
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_seed_same_sequence() {
    let mut a = GameRng::new(42);
    let mut b = GameRng::new(42);
    let xs: Vec<usize> = (0..16).map(|_| a.below(100)).collect();
    let ys: Vec<usize> = (0..16).map(|_| b.below(100)).collect();
    assert_eq!(xs, ys);
  }

  #[test]
  fn choose_empty_is_none() {
    let mut rng = GameRng::new(1);
    let empty: [u8; 0] = [];
    assert!(rng.choose(&empty).is_none());
    assert_eq!(rng.below(0), 0);
  }
}
