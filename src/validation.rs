//! Request validation for worksheet configurations.
//!
//! Works on the raw JSON value so every failing field is reported at once,
//! instead of stopping at serde's first error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{
  DifficultyMode, GradeLevel, Operation, Term, Topic, WorksheetConfig, WorksheetFormat,
};
use crate::error::ValidationIssue;
use crate::util::time_seed;

pub const MIN_QUESTIONS: u64 = 5;
pub const MAX_QUESTIONS: u64 = 50;

/// Collects issues while fields are checked one by one.
#[derive(Debug, Default)]
pub struct Issues {
  issues: Vec<ValidationIssue>,
}

impl Issues {
  pub fn add(&mut self, path: &str, message: impl Into<String>) {
    self.issues.push(ValidationIssue::new(path, message));
  }

  pub fn is_empty(&self) -> bool {
    self.issues.is_empty()
  }

  pub fn into_vec(self) -> Vec<ValidationIssue> {
    self.issues
  }
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str, issues: &mut Issues) -> Option<&'a Value> {
  match obj.get(key) {
    Some(Value::Null) | None => {
      issues.add(key, "Required");
      None
    }
    Some(v) => Some(v),
  }
}

/// Enum fields: accept exactly the serialized variant names.
fn enum_field<T: DeserializeOwned>(
  obj: &Map<String, Value>,
  key: &str,
  allowed: &str,
  issues: &mut Issues,
) -> Option<T> {
  let v = required(obj, key, issues)?;
  match serde_json::from_value::<T>(v.clone()) {
    Ok(t) => Some(t),
    Err(_) => {
      issues.add(key, format!("Invalid enum value. Expected {allowed}, received {v}"));
      None
    }
  }
}

fn bool_field(obj: &Map<String, Value>, key: &str, issues: &mut Issues) -> Option<bool> {
  match required(obj, key, issues)? {
    Value::Bool(b) => Some(*b),
    other => {
      issues.add(key, format!("Expected boolean, received {other}"));
      None
    }
  }
}

/// Integral JSON number (a float with no fractional part is accepted).
fn integer_field(obj: &Map<String, Value>, key: &str, issues: &mut Issues) -> Option<i64> {
  let v = required(obj, key, issues)?;
  if let Some(i) = v.as_i64() {
    return Some(i);
  }
  match v.as_f64() {
    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
    Some(_) => {
      issues.add(key, "Expected integer, received float");
      None
    }
    None => {
      issues.add(key, format!("Expected number, received {v}"));
      None
    }
  }
}

fn literal_field(obj: &Map<String, Value>, key: &str, allowed: &[i64], issues: &mut Issues) -> Option<i64> {
  let n = integer_field(obj, key, issues)?;
  if allowed.contains(&n) {
    Some(n)
  } else {
    let list = allowed.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(" | ");
    issues.add(key, format!("Invalid literal value, expected {list}"));
    None
  }
}

/// Validate a request body and build the configuration.
///
/// A missing or empty seed is replaced with a time-derived one.
pub fn validate_config(body: &Value) -> Result<WorksheetConfig, Vec<ValidationIssue>> {
  let mut issues = Issues::default();
  let Some(obj) = body.as_object() else {
    issues.add("", format!("Expected object, received {body}"));
    return Err(issues.into_vec());
  };

  let grade = enum_field::<GradeLevel>(obj, "grade", "'prep' | '1' | '2' | '3' | '4' | '5' | '6'", &mut issues);
  let term = literal_field(obj, "term", &[1, 2, 3, 4], &mut issues).and_then(|t| Term::new(t as u8));
  let topic = enum_field::<Topic>(obj, "topic", "'number' | 'measurement' | 'geometry' | 'statistics'", &mut issues);

  let operations = match required(obj, "operations", &mut issues) {
    Some(Value::Array(items)) if items.is_empty() => {
      issues.add("operations", "Array must contain at least 1 element(s)");
      None
    }
    Some(Value::Array(items)) => {
      let mut ops = Vec::with_capacity(items.len());
      let mut ok = true;
      for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<Operation>(item.clone()) {
          Ok(op) => ops.push(op),
          Err(_) => {
            ok = false;
            issues.add(
              &format!("operations.{i}"),
              format!("Invalid enum value. Expected 'addition' | 'subtraction' | 'multiplication' | 'division', received {item}"),
            );
          }
        }
      }
      ok.then_some(ops)
    }
    Some(other) => {
      issues.add("operations", format!("Expected array, received {other}"));
      None
    }
    None => None,
  };

  let min_operand = integer_field(obj, "minOperand", &mut issues).filter(|n| {
    let ok = *n >= 0;
    if !ok {
      issues.add("minOperand", "Number must be greater than or equal to 0");
    }
    ok
  });
  let max_operand = integer_field(obj, "maxOperand", &mut issues).filter(|n| {
    let ok = *n > 0;
    if !ok {
      issues.add("maxOperand", "Number must be greater than 0");
    }
    ok
  });
  let operands_per_question = literal_field(obj, "operandsPerQuestion", &[2, 3], &mut issues);
  let format = enum_field::<WorksheetFormat>(
    obj,
    "format",
    "'horizontal' | 'vertical' | 'fill-blank' | 'multiple-choice' | 'word'",
    &mut issues,
  );
  let question_count = integer_field(obj, "questionCount", &mut issues).filter(|n| {
    if *n < MIN_QUESTIONS as i64 {
      issues.add("questionCount", format!("Number must be greater than or equal to {MIN_QUESTIONS}"));
      false
    } else if *n > MAX_QUESTIONS as i64 {
      issues.add("questionCount", format!("Number must be less than or equal to {MAX_QUESTIONS}"));
      false
    } else {
      true
    }
  });
  let allow_carrying = bool_field(obj, "allowCarrying", &mut issues);
  let allow_borrowing = bool_field(obj, "allowBorrowing", &mut issues);
  let include_word_problems = bool_field(obj, "includeWordProblems", &mut issues);
  let include_time_limit = bool_field(obj, "includeTimeLimit", &mut issues);
  let difficulty_mode = enum_field::<DifficultyMode>(obj, "difficultyMode", "'fixed' | 'adaptive' | 'curriculum'", &mut issues);

  let seed = match obj.get("seed") {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) => Some(s.clone()),
    Some(other) => {
      issues.add("seed", format!("Expected string, received {other}"));
      None
    }
  };

  // Every `None` above has a matching issue, so this only fails alongside them.
  let (
    Some(grade), Some(term), Some(topic), Some(operations), Some(min_operand), Some(max_operand),
    Some(operands_per_question), Some(format), Some(question_count), Some(allow_carrying),
    Some(allow_borrowing), Some(include_word_problems), Some(include_time_limit), Some(difficulty_mode),
  ) = (
    grade, term, topic, operations, min_operand, max_operand, operands_per_question, format,
    question_count, allow_carrying, allow_borrowing, include_word_problems, include_time_limit,
    difficulty_mode,
  ) else {
    return Err(issues.into_vec());
  };
  if !issues.is_empty() {
    return Err(issues.into_vec());
  }

  if min_operand > max_operand {
    return Err(vec![ValidationIssue::new("minOperand", "minOperand must be less than maxOperand")]);
  }

  Ok(WorksheetConfig {
    grade,
    term,
    topic,
    operations,
    min_operand,
    max_operand,
    operands_per_question: operands_per_question as u8,
    format,
    question_count: question_count as u32,
    allow_carrying,
    allow_borrowing,
    include_word_problems,
    include_time_limit,
    difficulty_mode,
    seed: seed.filter(|s| !s.is_empty()).unwrap_or_else(time_seed),
  })
}
