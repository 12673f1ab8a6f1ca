//! Domain models: worksheet configuration, questions, and the generated payload.
//!
//! Field names serialize in camelCase so the JSON shape matches what the
//! worksheet UI sends and what gets persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// School year. `Prep` is the foundation year before grade 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
  #[serde(rename = "prep")] Prep,
  #[serde(rename = "1")] One,
  #[serde(rename = "2")] Two,
  #[serde(rename = "3")] Three,
  #[serde(rename = "4")] Four,
  #[serde(rename = "5")] Five,
  #[serde(rename = "6")] Six,
}

impl GradeLevel {
  pub const ALL: [GradeLevel; 7] = [
    GradeLevel::Prep, GradeLevel::One, GradeLevel::Two, GradeLevel::Three,
    GradeLevel::Four, GradeLevel::Five, GradeLevel::Six,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      GradeLevel::Prep => "prep",
      GradeLevel::One => "1",
      GradeLevel::Two => "2",
      GradeLevel::Three => "3",
      GradeLevel::Four => "4",
      GradeLevel::Five => "5",
      GradeLevel::Six => "6",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|g| g.as_str() == s)
  }
}

impl fmt::Display for GradeLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// School term, 1..=4. Serialized as a bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Term(u8);

impl Term {
  pub const FIRST: Term = Term(1);

  pub fn new(n: u8) -> Option<Self> {
    (1..=4).contains(&n).then_some(Term(n))
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Term {
  type Error = String;
  fn try_from(n: u8) -> Result<Self, Self::Error> {
    Term::new(n).ok_or_else(|| format!("term must be 1, 2, 3 or 4 (got {n})"))
  }
}

impl From<Term> for u8 {
  fn from(t: Term) -> u8 { t.0 }
}

impl fmt::Display for Term {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
  Number,
  Measurement,
  Geometry,
  Statistics,
}

impl Topic {
  pub fn as_str(self) -> &'static str {
    match self {
      Topic::Number => "number",
      Topic::Measurement => "measurement",
      Topic::Geometry => "geometry",
      Topic::Statistics => "statistics",
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  Addition,
  Subtraction,
  Multiplication,
  Division,
}

impl Operation {
  /// Display symbol used in prompts. Subtraction uses U+2212, not a hyphen.
  pub fn symbol(self) -> &'static str {
    match self {
      Operation::Addition => "+",
      Operation::Subtraction => "−",
      Operation::Multiplication => "×",
      Operation::Division => "÷",
    }
  }
}

/// How a question is laid out on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorksheetFormat {
  Horizontal,
  Vertical,
  FillBlank,
  MultipleChoice,
  Word,
}

/// Carried through for the UI; the generator does not act on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
  Fixed,
  Adaptive,
  Curriculum,
}

/// Full worksheet configuration. Never mutated by the generator.
///
/// `min_operand <= max_operand` and a non-empty `operations` list are the
/// caller's responsibility (see `validation`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetConfig {
  pub grade: GradeLevel,
  pub term: Term,
  pub topic: Topic,
  pub operations: Vec<Operation>,
  pub min_operand: i64,
  pub max_operand: i64,
  pub operands_per_question: u8,
  pub format: WorksheetFormat,
  pub question_count: u32,
  pub allow_carrying: bool,
  pub allow_borrowing: bool,
  pub include_word_problems: bool,
  #[serde(default)]
  pub include_time_limit: bool,
  pub difficulty_mode: DifficultyMode,
  #[serde(default)]
  pub seed: String,
}

/// Raw material a question was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
  pub operands: Vec<i64>,
  pub operator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetQuestion {
  pub id: String,
  pub prompt: String,
  pub answer: String,
  pub operation: Operation,
  pub format: WorksheetFormat,
  pub metadata: QuestionMetadata,
}

/// Output of one generation call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetPayload {
  pub config: WorksheetConfig,
  pub questions: Vec<WorksheetQuestion>,
  pub generated_at: String,
}

/// Row written to the persistence sink. Enough to regenerate the payload.
#[derive(Clone, Debug, Serialize)]
pub struct WorksheetRecord {
  pub config: WorksheetConfig,
  pub generated_at: String,
  pub question_count: usize,
  pub seed: String,
}

impl WorksheetRecord {
  pub fn from_payload(p: &WorksheetPayload) -> Self {
    Self {
      config: p.config.clone(),
      generated_at: p.generated_at.clone(),
      question_count: p.questions.len(),
      seed: p.config.seed.clone(),
    }
  }
}
