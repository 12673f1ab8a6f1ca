//! Prompt text for arithmetic questions, one layout per worksheet format.

use crate::domain::{Operation, WorksheetFormat};

/// Rule drawn under a vertical sum.
const VERTICAL_RULE: &str = "——";

fn pad_start(value: i64, width: usize) -> String {
  format!("{value:>width$}")
}

fn inline(operands: &[i64], symbol: &str) -> String {
  operands
    .iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join(&format!(" {symbol} "))
}

/// Stacked layout: first operand right-aligned to 4 columns, operator beside
/// the second operand, rule underneath. A third operand goes on a middle line.
fn vertical(operands: &[i64], symbol: &str) -> String {
  let mut lines = Vec::with_capacity(4);
  if let Some(first) = operands.first() {
    lines.push(pad_start(*first, 4));
  }
  if let Some(second) = operands.get(1) {
    lines.push(format!("{symbol} {}", pad_start(*second, 2)));
  }
  lines.push(VERTICAL_RULE.to_string());
  if let Some(third) = operands.get(2) {
    lines.insert(1, format!("  {symbol} {}", pad_start(*third, 2)));
  }
  lines.join("\n")
}

pub fn format_prompt(operands: &[i64], operation: Operation, format: WorksheetFormat) -> String {
  let symbol = operation.symbol();
  match format {
    WorksheetFormat::Vertical => vertical(operands, symbol),
    WorksheetFormat::FillBlank => format!("{} = ____", inline(operands, symbol)),
    WorksheetFormat::MultipleChoice => format!("{} = ?", inline(operands, symbol)),
    WorksheetFormat::Horizontal | WorksheetFormat::Word => format!("{} =", inline(operands, symbol)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn horizontal() {
    assert_eq!(format_prompt(&[3, 4], Operation::Addition, WorksheetFormat::Horizontal), "3 + 4 =");
    assert_eq!(format_prompt(&[2, 3, 4], Operation::Multiplication, WorksheetFormat::Horizontal), "2 × 3 × 4 =");
  }

  #[test]
  fn fill_blank_and_multiple_choice() {
    assert_eq!(format_prompt(&[9, 2], Operation::Subtraction, WorksheetFormat::FillBlank), "9 − 2 = ____");
    assert_eq!(format_prompt(&[8, 4], Operation::Division, WorksheetFormat::MultipleChoice), "8 ÷ 4 = ?");
  }

  #[test]
  fn vertical_two_operands() {
    let p = format_prompt(&[12, 7], Operation::Addition, WorksheetFormat::Vertical);
    assert_eq!(p, "  12\n+  7\n——");
  }

  #[test]
  fn vertical_third_operand_is_middle_line() {
    let p = format_prompt(&[12, 7, 30], Operation::Addition, WorksheetFormat::Vertical);
    assert_eq!(p, "  12\n  + 30\n+  7\n——");
  }
}
