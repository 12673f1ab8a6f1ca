//! Built-in curriculum presets and the base configuration.
//!
//! A preset only names the fields that differ per grade/term; everything
//! else comes from `default_config()`. Presets from the TOML config file
//! (`CurriculumOverride`) are applied on top of the built-in ones.

use serde::{Deserialize, Serialize};

use crate::domain::{
  DifficultyMode, GradeLevel, Operation, Term, Topic, WorksheetConfig, WorksheetFormat,
};

use crate::domain::Operation::{Addition as Add, Division as Div, Multiplication as Mul, Subtraction as Sub};

/// Partial configuration for one grade/term.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumPreset {
  #[serde(default)] pub min_operand: Option<i64>,
  #[serde(default)] pub max_operand: Option<i64>,
  #[serde(default)] pub operations: Option<Vec<Operation>>,
  #[serde(default)] pub operands_per_question: Option<u8>,
  #[serde(default)] pub allow_carrying: Option<bool>,
  #[serde(default)] pub allow_borrowing: Option<bool>,
  #[serde(default)] pub include_word_problems: Option<bool>,
}

impl CurriculumPreset {
  pub fn apply(&self, config: &mut WorksheetConfig) {
    if let Some(v) = self.min_operand { config.min_operand = v; }
    if let Some(v) = self.max_operand { config.max_operand = v; }
    if let Some(v) = &self.operations { config.operations = v.clone(); }
    if let Some(v) = self.operands_per_question { config.operands_per_question = v; }
    if let Some(v) = self.allow_carrying { config.allow_carrying = v; }
    if let Some(v) = self.allow_borrowing { config.allow_borrowing = v; }
    if let Some(v) = self.include_word_problems { config.include_word_problems = v; }
  }
}

/// Preset entry accepted in the TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct CurriculumOverride {
  pub grade: GradeLevel,
  pub term: Term,
  #[serde(flatten)]
  pub preset: CurriculumPreset,
}

/// Base configuration every preset starts from.
pub fn default_config() -> WorksheetConfig {
  WorksheetConfig {
    grade: GradeLevel::Three,
    term: Term::FIRST,
    topic: Topic::Number,
    operations: vec![Add, Sub],
    min_operand: 0,
    max_operand: 50,
    operands_per_question: 2,
    format: WorksheetFormat::Horizontal,
    question_count: 36,
    allow_carrying: true,
    allow_borrowing: true,
    include_word_problems: false,
    include_time_limit: false,
    difficulty_mode: DifficultyMode::Fixed,
    seed: "preview".into(),
  }
}

fn preset(
  max_operand: i64,
  operations: &[Operation],
  operands_per_question: u8,
  regroup: bool,
  word_problems: bool,
) -> CurriculumPreset {
  CurriculumPreset {
    min_operand: Some(0),
    max_operand: Some(max_operand),
    operations: Some(operations.to_vec()),
    operands_per_question: Some(operands_per_question),
    allow_carrying: Some(regroup),
    allow_borrowing: Some(regroup),
    // Presets without word problems leave the base value alone.
    include_word_problems: word_problems.then_some(true),
  }
}

/// Built-in preset for a grade/term.
pub fn builtin_preset(grade: GradeLevel, term: Term) -> CurriculumPreset {
  let t = term.get();
  match grade {
    GradeLevel::Prep if t <= 2 => preset(10, &[Add, Sub], 2, false, false),
    GradeLevel::Prep => preset(20, &[Add, Sub], 2, false, false),
    GradeLevel::One if t <= 2 => preset(20, &[Add, Sub], 2, false, false),
    GradeLevel::One => preset(50, &[Add, Sub], 2, true, false),
    GradeLevel::Two => match t {
      1 => preset(99, &[Add, Sub], 2, true, true),
      2 => preset(99, &[Add, Sub], 3, true, true),
      _ => preset(144, &[Add, Sub, Mul], 2, true, true),
    },
    GradeLevel::Three => match t {
      1 => preset(500, &[Add, Sub, Mul], 2, true, false),
      2 => preset(500, &[Add, Sub, Mul], 3, true, false),
      _ => preset(999, &[Add, Sub, Mul, Div], 2, true, false),
    },
    GradeLevel::Four | GradeLevel::Five => preset(999, &[Add, Sub, Mul, Div], 3, true, true),
    GradeLevel::Six => preset(10_000, &[Add, Sub, Mul, Div], 3, true, true),
  }
}

/// Base config + built-in preset + any matching overrides, in that order.
pub fn curriculum_config(
  grade: GradeLevel,
  term: Term,
  overrides: &[CurriculumOverride],
) -> WorksheetConfig {
  let mut config = WorksheetConfig { grade, term, ..default_config() };
  builtin_preset(grade, term).apply(&mut config);
  for o in overrides.iter().filter(|o| o.grade == grade && o.term == term) {
    o.preset.apply(&mut config);
  }
  config
}

/// Suggested maximum-operand choices offered for a grade.
pub fn number_range_presets(grade: GradeLevel) -> [i64; 2] {
  match grade {
    GradeLevel::Prep => [10, 20],
    GradeLevel::One => [20, 50],
    GradeLevel::Two => [50, 100],
    GradeLevel::Three => [100, 500],
    GradeLevel::Four => [100, 1000],
    GradeLevel::Five => [500, 1000],
    GradeLevel::Six => [1000, 10_000],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn term(n: u8) -> Term {
    Term::new(n).unwrap()
  }

  #[test]
  fn prep_term_one_is_small_and_strict() {
    let c = curriculum_config(GradeLevel::Prep, term(1), &[]);
    assert_eq!((c.min_operand, c.max_operand), (0, 10));
    assert_eq!(c.operations, vec![Add, Sub]);
    assert!(!c.allow_carrying && !c.allow_borrowing);
    assert!(!c.include_word_problems);
    assert_eq!(c.grade, GradeLevel::Prep);
  }

  #[test]
  fn grade_two_term_two_uses_three_operands_and_word_problems() {
    let c = curriculum_config(GradeLevel::Two, term(2), &[]);
    assert_eq!(c.max_operand, 99);
    assert_eq!(c.operands_per_question, 3);
    assert!(c.include_word_problems);
  }

  #[test]
  fn grade_three_late_terms_add_division() {
    let c = curriculum_config(GradeLevel::Three, term(3), &[]);
    assert_eq!(c.operations, vec![Add, Sub, Mul, Div]);
    assert_eq!(c.max_operand, 999);
    assert!(!c.include_word_problems);
  }

  #[test]
  fn grade_six_goes_to_ten_thousand() {
    for t in 1..=4 {
      let c = curriculum_config(GradeLevel::Six, term(t), &[]);
      assert_eq!(c.max_operand, 10_000);
      assert_eq!(c.operands_per_question, 3);
    }
  }

  #[test]
  fn non_preset_fields_come_from_base() {
    let c = curriculum_config(GradeLevel::Four, term(4), &[]);
    assert_eq!(c.question_count, 36);
    assert_eq!(c.format, WorksheetFormat::Horizontal);
    assert_eq!(c.seed, "preview");
  }

  #[test]
  fn override_applies_on_top_of_builtin() {
    let overrides: Vec<CurriculumOverride> = toml::from_str::<Wrapper>(
      r#"
        [[curriculum]]
        grade = "1"
        term = 1
        maxOperand = 15
        operations = ["addition"]
      "#,
    )
    .unwrap()
    .curriculum;

    let c = curriculum_config(GradeLevel::One, term(1), &overrides);
    assert_eq!(c.max_operand, 15);
    assert_eq!(c.operations, vec![Add]);
    assert!(!c.allow_carrying);

    let untouched = curriculum_config(GradeLevel::One, term(2), &overrides);
    assert_eq!(untouched.max_operand, 20);
  }

  #[derive(Deserialize)]
  struct Wrapper {
    curriculum: Vec<CurriculumOverride>,
  }

  #[test]
  fn range_presets_grow_with_grade() {
    assert_eq!(number_range_presets(GradeLevel::Prep), [10, 20]);
    assert_eq!(number_range_presets(GradeLevel::Six), [1000, 10_000]);
  }
}
