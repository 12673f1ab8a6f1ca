//! Word problems built from small name / object / activity vocabularies.
//!
//! Draw order per problem: first name, second name, object, activity, then
//! the operands. No carry/borrow rule is applied here.

use crate::domain::{Operation, WorksheetConfig, WorksheetFormat, WorksheetQuestion};
use crate::error::RangeError;
use crate::generator::rng::SeededRng;
use crate::generator::sampler::{compute_answer, generate_operands};
use crate::generator::question;
use crate::util::fill_template;

pub const NAMES: [&str; 10] = [
  "Ava", "Noah", "Liam", "Sophia", "Ethan", "Mia", "Lucas", "Isla", "Oliver", "Amelia",
];

pub const OBJECTS: [&str; 8] = [
  "shells", "marbles", "stickers", "books", "pencils", "apples", "balloons", "blocks",
];

pub const ACTIVITIES: [&str; 6] = ["collects", "shares", "gives", "keeps", "finds", "loses"];

/// Offset applied to the first name's index when both draws collide.
const NAME_COLLISION_OFFSET: usize = 3;

fn template(operation: Operation) -> &'static str {
  match operation {
    Operation::Addition =>
      "{name_a} has {x} {object}. {name_b} {activity} {y} more. How many {object} do they have altogether?",
    Operation::Subtraction =>
      "{name_a} collected {x} {object}. They {activity} {y} to {name_b}. How many {object} are left?",
    Operation::Multiplication =>
      "{name_a} arranges {object} into {x} groups with {y} in each group. How many {object} are there?",
    Operation::Division =>
      "{name_a} has {x} {object} and shares them equally with {y} friends. How many {object} does each person receive?",
  }
}

fn pick<'a>(words: &[&'a str], rng: &mut SeededRng) -> Result<(usize, &'a str), RangeError> {
  let idx = rng.int_in(0, words.len() as i64 - 1)? as usize;
  Ok((idx, words[idx]))
}

/// Two distinct names. A collision is resolved by a fixed offset, not a re-roll.
fn pick_names(rng: &mut SeededRng) -> Result<(&'static str, &'static str), RangeError> {
  let (idx_a, name_a) = pick(&NAMES, rng)?;
  let (_, mut name_b) = pick(&NAMES, rng)?;
  if name_a == name_b {
    name_b = NAMES[(idx_a + NAME_COLLISION_OFFSET) % NAMES.len()];
  }
  Ok((name_a, name_b))
}

/// Compose one word problem. Always tagged `WorksheetFormat::Word`.
///
/// The sentence shows the first two operands; the answer is computed over
/// every drawn operand.
pub fn generate_word_problem(
  id: String,
  operation: Operation,
  config: &WorksheetConfig,
  rng: &mut SeededRng,
) -> Result<WorksheetQuestion, RangeError> {
  let (name_a, name_b) = pick_names(rng)?;
  let (_, object) = pick(&OBJECTS, rng)?;
  let (_, activity) = pick(&ACTIVITIES, rng)?;
  let operands = generate_operands(operation, config, rng)?;
  let answer = compute_answer(&operands, operation);

  let nth = |i: usize| operands.get(i).map(|v| v.to_string()).unwrap_or_default();
  let (x, y) = (nth(0), nth(1));
  let prompt = fill_template(
    template(operation),
    &[
      ("name_a", name_a),
      ("name_b", name_b),
      ("object", object),
      ("activity", activity),
      ("x", &x),
      ("y", &y),
    ],
  );

  Ok(question(id, prompt, answer, operation, WorksheetFormat::Word, operands))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curriculum::default_config;

  fn config() -> WorksheetConfig {
    let mut c = default_config();
    c.min_operand = 1;
    c.max_operand = 20;
    c
  }

  #[test]
  fn word_problem_is_tagged_word() {
    let mut rng = SeededRng::from_seed_str("word");
    let q = generate_word_problem("q-5".into(), Operation::Addition, &config(), &mut rng).unwrap();
    assert_eq!(q.format, WorksheetFormat::Word);
    assert_eq!(q.id, "q-5");
    assert!(q.prompt.ends_with("do they have altogether?"), "{}", q.prompt);
  }

  #[test]
  fn names_are_always_distinct() {
    let mut rng = SeededRng::from_seed_str("names");
    for _ in 0..500 {
      let (a, b) = pick_names(&mut rng).unwrap();
      assert_ne!(a, b);
    }
  }

  #[test]
  fn prompt_mentions_operands_and_vocabulary() {
    let mut rng = SeededRng::from_seed_str("vocab");
    for op in [Operation::Addition, Operation::Subtraction, Operation::Multiplication, Operation::Division] {
      let q = generate_word_problem("q-1".into(), op, &config(), &mut rng).unwrap();
      let ops = &q.metadata.operands;
      assert!(q.prompt.contains(&ops[0].to_string()));
      assert!(q.prompt.contains(&ops[1].to_string()));
      assert!(NAMES.iter().any(|n| q.prompt.starts_with(n)), "{}", q.prompt);
      assert!(OBJECTS.iter().any(|o| q.prompt.contains(o)), "{}", q.prompt);
      assert_eq!(q.answer, compute_answer(ops, op).to_string());
    }
  }

  #[test]
  fn subtraction_template_uses_second_name() {
    let mut rng = SeededRng::from_seed_str("sub");
    let q = generate_word_problem("q-1".into(), Operation::Subtraction, &config(), &mut rng).unwrap();
    assert!(q.prompt.contains(" to "));
    assert!(q.prompt.ends_with("are left?"));
  }
}
