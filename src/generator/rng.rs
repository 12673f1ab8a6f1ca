//! Seeded PRNG: a seed string becomes a reproducible stream of draws in [0, 1).
//!
//! The seed is hashed with SHA-256 and the digest keys a `StdRng` (ChaCha),
//! so the stream is identical across processes and platforms for a given
//! `rand` release. No entropy source is ever consulted.

use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::RangeError;

/// Per-call generator state. Owned by one generation run, never shared.
pub struct SeededRng {
  inner: StdRng,
}

impl SeededRng {
  pub fn from_seed_str(seed: &str) -> Self {
    let key: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    Self { inner: StdRng::from_seed(key) }
  }

  /// Next uniform draw in [0, 1).
  pub fn draw(&mut self) -> f64 {
    self.inner.gen::<f64>()
  }

  /// Uniform integer in the inclusive range `[min, max]`.
  ///
  /// Consumes exactly one draw: `floor(draw * (max - min + 1)) + min`.
  pub fn int_in(&mut self, min: i64, max: i64) -> Result<i64, RangeError> {
    if max < min {
      return Err(RangeError::InvalidRange { low: min, high: max });
    }
    let span = (max as i128 - min as i128 + 1) as f64;
    let offset = (self.draw() * span).floor() as i128;
    // f64 rounding on very wide spans can land one past the end.
    Ok((min as i128 + offset).min(max as i128) as i64)
  }

  /// Uniform index in `[0, len)`. `len` must be non-zero.
  pub fn index(&mut self, len: usize) -> usize {
    let idx = (self.draw() * len as f64).floor() as usize;
    idx.min(len.saturating_sub(1))
  }
}
