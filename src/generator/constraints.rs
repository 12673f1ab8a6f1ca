//! No-carry / no-borrow enforcement by full resampling.
//!
//! Best effort: after `MAX_CONSTRAINT_ATTEMPTS` rejected draws the last draw is
//! used as-is, even if it still carries or borrows.

use crate::domain::{Operation, WorksheetConfig};
use crate::error::RangeError;
use crate::generator::rng::SeededRng;
use crate::generator::sampler::generate_operands;

pub const MAX_CONSTRAINT_ATTEMPTS: usize = 100;

/// Operands after enforcement. `satisfied` is false only when the attempt
/// budget ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstrainedOperands {
  pub operands: Vec<i64>,
  pub satisfied: bool,
}

fn digit_at(value: i64, place: i64) -> i64 {
  value.div_euclid(place) % 10
}

fn digit_len(value: i64) -> usize {
  value.to_string().len()
}

/// Place values 1, 10, 100, ... covering every digit of `widest`.
fn places(widest: i64) -> impl Iterator<Item = i64> {
  std::iter::successors(Some(1i64), |p| p.checked_mul(10)).take(digit_len(widest))
}

/// True if any column sum across `operands` reaches 10.
pub fn has_carrying(operands: &[i64]) -> bool {
  let Some(widest) = operands.iter().copied().max() else {
    return false;
  };
  places(widest).any(|place| {
    operands.iter().map(|v| digit_at(*v, place)).sum::<i64>() >= 10
  })
}

/// True if any minuend digit is smaller than the subtrahend digit below it.
pub fn has_borrowing(minuend: i64, subtrahend: i64) -> bool {
  places(minuend.max(subtrahend)).any(|place| digit_at(minuend, place) < digit_at(subtrahend, place))
}

/// Draw operands for an arithmetic question, resampling until the carry or
/// borrow rule holds.
///
/// Only addition with `allowCarrying == false` and subtraction with
/// `allowBorrowing == false` are checked. An accepted no-borrow draw is
/// rewritten as `[max, min]`; every other accepted draw keeps its order.
pub fn constrained_operands(
  operation: Operation,
  config: &WorksheetConfig,
  rng: &mut SeededRng,
) -> Result<ConstrainedOperands, RangeError> {
  let mut operands = generate_operands(operation, config, rng)?;
  let mut attempts = 0;

  while attempts < MAX_CONSTRAINT_ATTEMPTS {
    match operation {
      Operation::Addition if !config.allow_carrying => {
        if !has_carrying(&operands) {
          return Ok(ConstrainedOperands { operands, satisfied: true });
        }
      }
      Operation::Subtraction if !config.allow_borrowing => {
        let minuend = operands.iter().copied().max().unwrap_or(0);
        let subtrahend = operands.iter().copied().min().unwrap_or(0);
        if minuend >= subtrahend && !has_borrowing(minuend, subtrahend) {
          return Ok(ConstrainedOperands { operands: vec![minuend, subtrahend], satisfied: true });
        }
      }
      _ => return Ok(ConstrainedOperands { operands, satisfied: true }),
    }

    operands = generate_operands(operation, config, rng)?;
    attempts += 1;
  }

  Ok(ConstrainedOperands { operands, satisfied: false })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curriculum::default_config;

  #[test]
  fn carrying_detection() {
    assert!(!has_carrying(&[12, 34]));
    assert!(has_carrying(&[15, 25]));
    assert!(has_carrying(&[50, 60]));
    assert!(!has_carrying(&[3, 3, 3]));
    assert!(has_carrying(&[4, 3, 3]));
    assert!(!has_carrying(&[]));
    assert!(!has_carrying(&[0, 0]));
  }

  #[test]
  fn carrying_checks_every_place_of_widest_operand() {
    // 1 + 999: units 1+9 = 10
    assert!(has_carrying(&[1, 999]));
    // 100 + 900: hundreds 1+9 = 10
    assert!(has_carrying(&[100, 900]));
    assert!(!has_carrying(&[100, 800]));
  }

  #[test]
  fn borrowing_detection() {
    assert!(!has_borrowing(58, 23));
    assert!(has_borrowing(52, 28));
    assert!(has_borrowing(105, 60));
    assert!(!has_borrowing(9, 0));
    assert!(!has_borrowing(7, 7));
  }

  #[test]
  fn no_carry_enforced_for_addition() {
    let mut config = default_config();
    config.min_operand = 0;
    config.max_operand = 99;
    config.allow_carrying = false;
    let mut rng = SeededRng::from_seed_str("no-carry");
    for _ in 0..200 {
      let got = constrained_operands(Operation::Addition, &config, &mut rng).unwrap();
      if got.satisfied {
        assert!(!has_carrying(&got.operands), "carry in {:?}", got.operands);
      }
    }
  }

  #[test]
  fn no_borrow_reorders_to_max_min() {
    let mut config = default_config();
    config.min_operand = 0;
    config.max_operand = 99;
    config.allow_borrowing = false;
    let mut rng = SeededRng::from_seed_str("no-borrow");
    for _ in 0..200 {
      let got = constrained_operands(Operation::Subtraction, &config, &mut rng).unwrap();
      if got.satisfied {
        assert!(got.operands[0] >= got.operands[1]);
        assert!(!has_borrowing(got.operands[0], got.operands[1]));
      }
    }
  }

  #[test]
  fn unconstrained_subtraction_keeps_draw_order() {
    let mut config = default_config();
    config.min_operand = 0;
    config.max_operand = 50;
    config.allow_borrowing = true;
    let mut a = SeededRng::from_seed_str("order");
    let mut b = SeededRng::from_seed_str("order");
    for _ in 0..50 {
      let drawn = generate_operands(Operation::Subtraction, &config, &mut a).unwrap();
      let got = constrained_operands(Operation::Subtraction, &config, &mut b).unwrap();
      assert_eq!(got.operands, drawn);
    }
  }

  #[test]
  fn exhaustion_keeps_last_draw() {
    // Every operand is 5, so 5 + 5 always carries.
    let mut config = default_config();
    config.min_operand = 5;
    config.max_operand = 5;
    config.allow_carrying = false;
    let mut rng = SeededRng::from_seed_str("stuck");
    let got = constrained_operands(Operation::Addition, &config, &mut rng).unwrap();
    assert!(!got.satisfied);
    assert_eq!(got.operands, vec![5, 5]);
  }

  #[test]
  fn multiplication_is_never_resampled() {
    let mut config = default_config();
    config.allow_carrying = false;
    config.allow_borrowing = false;
    let mut a = SeededRng::from_seed_str("mul");
    let mut b = SeededRng::from_seed_str("mul");
    let drawn = generate_operands(Operation::Multiplication, &config, &mut a).unwrap();
    let got = constrained_operands(Operation::Multiplication, &config, &mut b).unwrap();
    assert_eq!(got.operands, drawn);
    assert!(got.satisfied);
  }
}
