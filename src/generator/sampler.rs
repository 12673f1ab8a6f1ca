//! Operation choice, operand draws, and answer computation.

use crate::domain::{Operation, WorksheetConfig};
use crate::error::RangeError;
use crate::generator::rng::SeededRng;

/// Upper bound on draws per operand set.
const MAX_OPERAND_DRAWS: usize = 50;

/// Pick one operation uniformly from the configured list.
///
/// An empty list yields `Addition` without consuming a draw.
pub fn select_operation(operations: &[Operation], rng: &mut SeededRng) -> Operation {
  if operations.is_empty() {
    return Operation::Addition;
  }
  operations[rng.index(operations.len())]
}

/// Subtraction is always binary; everything else follows `operandsPerQuestion`.
pub fn operand_count(operation: Operation, config: &WorksheetConfig) -> usize {
  match operation {
    Operation::Subtraction => 2,
    _ => config.operands_per_question as usize,
  }
}

/// Draw a fresh operand set, each value uniform in `[minOperand, maxOperand]`.
pub fn generate_operands(
  operation: Operation,
  config: &WorksheetConfig,
  rng: &mut SeededRng,
) -> Result<Vec<i64>, RangeError> {
  let count = operand_count(operation, config);
  let mut operands = Vec::with_capacity(count);
  let mut attempts = 0;
  while operands.len() < count && attempts < MAX_OPERAND_DRAWS {
    operands.push(rng.int_in(config.min_operand, config.max_operand)?);
    attempts += 1;
  }
  Ok(operands)
}

/// Evaluate the operands in the order they are displayed.
///
/// Subtraction uses the first two operands as drawn (the result may be
/// negative). Division floors, with the divisor clamped to at least 1.
pub fn compute_answer(operands: &[i64], operation: Operation) -> i64 {
  let nth = |i: usize| operands.get(i).copied().unwrap_or(0);
  match operation {
    Operation::Addition => operands.iter().fold(0i64, |acc, v| acc.saturating_add(*v)),
    Operation::Subtraction => nth(0).saturating_sub(nth(1)),
    Operation::Multiplication => operands.iter().fold(1i64, |acc, v| acc.saturating_mul(*v)),
    Operation::Division => nth(0).div_euclid(nth(1).max(1)),
  }
}
