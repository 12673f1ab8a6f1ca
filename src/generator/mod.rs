//! Deterministic worksheet generator.
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `rng`         | Seed string -> reproducible draws; `int_in` range helper |
//! | `sampler`     | Operation choice, operand draws, answer computation |
//! | `constraints` | No-carry / no-borrow resampling (best effort) |
//! | `format`      | Prompt layout per worksheet format |
//! | `word`        | Word-problem composer |
//!
//! ## Draw order
//!
//! One `SeededRng` is threaded through every draw of a run, in question
//! order: operation, then either the word-problem draws or the arithmetic
//! operand draws (including any resamples). Reordering draws changes the
//! output for the same seed.

pub mod constraints;
pub mod format;
pub mod rng;
pub mod sampler;
pub mod word;

use tracing::debug;

use crate::domain::{
  Operation, Topic, WorksheetConfig, WorksheetFormat, WorksheetPayload, WorksheetQuestion,
  QuestionMetadata,
};
use crate::error::RangeError;
use crate::util::{now_iso, time_seed};

use constraints::constrained_operands;
use format::format_prompt;
use rng::SeededRng;
use sampler::{compute_answer, select_operation};

/// Every fifth question (0-based 4, 9, 14, ...) may become a word problem.
const WORD_PROBLEM_EVERY: u32 = 5;

/// Build one question record.
pub(crate) fn question(
  id: String,
  prompt: String,
  answer: i64,
  operation: Operation,
  format: WorksheetFormat,
  operands: Vec<i64>,
) -> WorksheetQuestion {
  WorksheetQuestion {
    id,
    prompt,
    answer: answer.to_string(),
    operation,
    format,
    metadata: QuestionMetadata { operands, operator: operation.symbol().to_string() },
  }
}

/// Whether question `index` (0-based) is replaced by a word problem.
pub fn is_word_problem_slot(config: &WorksheetConfig, index: u32) -> bool {
  config.include_word_problems
    && index % WORD_PROBLEM_EVERY == WORD_PROBLEM_EVERY - 1
    && config.topic == Topic::Number
}

/// Seed precedence: explicit override, then `config.seed`, then the clock.
pub fn resolve_seed(config: &WorksheetConfig, seed: Option<&str>) -> String {
  seed
    .map(str::to_owned)
    .or_else(|| (!config.seed.is_empty()).then(|| config.seed.clone()))
    .unwrap_or_else(time_seed)
}

fn arithmetic_question(
  id: String,
  operation: Operation,
  config: &WorksheetConfig,
  rng: &mut SeededRng,
) -> Result<(WorksheetQuestion, bool), RangeError> {
  let drawn = constrained_operands(operation, config, rng)?;
  let prompt = format_prompt(&drawn.operands, operation, config.format);
  let answer = compute_answer(&drawn.operands, operation);
  Ok((question(id, prompt, answer, operation, config.format, drawn.operands), drawn.satisfied))
}

/// Generate a full worksheet.
///
/// The only error is `RangeError::InvalidRange`, raised when
/// `minOperand > maxOperand`; validated configurations never hit it.
/// Everything else degrades silently: an empty operation list means
/// addition, and an exhausted carry/borrow budget keeps the last draw.
pub fn generate_worksheet(
  config: &WorksheetConfig,
  seed: Option<&str>,
) -> Result<WorksheetPayload, RangeError> {
  let seed = resolve_seed(config, seed);
  let mut rng = SeededRng::from_seed_str(&seed);

  let mut questions = Vec::with_capacity(config.question_count as usize);
  let mut unsatisfied = 0usize;
  for i in 0..config.question_count {
    let operation = select_operation(&config.operations, &mut rng);
    let id = format!("q-{}", i + 1);

    let q = if is_word_problem_slot(config, i) {
      word::generate_word_problem(id, operation, config, &mut rng)?
    } else {
      let (q, satisfied) = arithmetic_question(id, operation, config, &mut rng)?;
      if !satisfied {
        unsatisfied += 1;
      }
      q
    };
    questions.push(q);
  }

  debug!(target: "worksheet", %seed, count = questions.len(), unsatisfied, "Worksheet generated");

  Ok(WorksheetPayload {
    config: config.clone(),
    questions,
    generated_at: now_iso(),
  })
}
