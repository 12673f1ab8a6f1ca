//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Parsing and validating worksheet requests
//!   - Generating the worksheet and handing the record to persistence
//!   - Rendering the PDF
//!   - Curriculum lookups

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::curriculum::{curriculum_config, number_range_presets};
use crate::domain::{GradeLevel, Term, WorksheetConfig, WorksheetPayload, WorksheetRecord};
use crate::error::ApiError;
use crate::generator::generate_worksheet;
use crate::persist::spawn_persist;
use crate::protocol::CurriculumOut;
use crate::render::{RenderedDocument, WorksheetRenderer};
use crate::state::AppState;
use crate::validation::validate_config;

/// Body bytes -> validated configuration (seed always filled in).
#[instrument(level = "debug", skip(body), fields(body_len = body.len()))]
pub fn parse_request(body: &[u8]) -> Result<WorksheetConfig, ApiError> {
  let value: Value = serde_json::from_slice(body).map_err(|e| {
    warn!(target: "worksheet", error = %e, "Malformed JSON body");
    ApiError::Malformed(e.to_string())
  })?;
  validate_config(&value).map_err(|issues| {
    warn!(target: "worksheet", issues = issues.len(), "Worksheet config rejected");
    ApiError::Validation(issues)
  })
}

/// Questions only; nothing is stored or rendered.
#[instrument(level = "info", skip(body))]
pub fn preview_worksheet(body: &[u8]) -> Result<WorksheetPayload, ApiError> {
  let config = parse_request(body)?;
  let payload = generate_worksheet(&config, None)?;
  debug!(target: "worksheet", seed = %payload.config.seed, questions = payload.questions.len(), "Preview generated");
  Ok(payload)
}

/// Full flow: validate, generate, persist in the background, render.
///
/// Persistence is spawned before rendering and is never awaited, so a slow
/// or failing database cannot delay or fail the download.
#[instrument(level = "info", skip(state, body))]
pub fn worksheet_document(
  state: &AppState,
  body: &[u8],
) -> Result<(WorksheetPayload, RenderedDocument), ApiError> {
  let config = parse_request(body)?;
  let payload = generate_worksheet(&config, None)?;

  spawn_persist(state.sink.clone(), WorksheetRecord::from_payload(&payload));

  let doc = state.renderer.render(&payload)?;
  info!(
    target: "worksheet",
    seed = %payload.config.seed,
    questions = payload.questions.len(),
    bytes = doc.bytes.len(),
    "Worksheet PDF rendered"
  );
  Ok((payload, doc))
}

/// Preset configuration for a grade/term plus the grade's range suggestions.
#[instrument(level = "info", skip(state))]
pub fn curriculum_lookup(state: &AppState, grade: Option<&str>, term: Option<&str>) -> Result<CurriculumOut, ApiError> {
  let grade = grade
    .and_then(GradeLevel::parse)
    .ok_or_else(|| ApiError::BadRequest("grade must be one of prep, 1, 2, 3, 4, 5, 6".into()))?;
  let term = term
    .and_then(|t| t.trim().parse::<u8>().ok())
    .and_then(Term::new)
    .ok_or_else(|| ApiError::BadRequest("term must be one of 1, 2, 3, 4".into()))?;

  Ok(CurriculumOut {
    config: curriculum_config(grade, term, &state.settings.curriculum),
    number_range_presets: number_range_presets(grade),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn malformed_json_is_400() {
    let err = parse_request(b"{not json").unwrap_err();
    assert!(matches!(err, ApiError::Malformed(_)));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
  }

  #[test]
  fn schema_failures_are_422() {
    let err = parse_request(br#"{"grade":"3"}"#).unwrap_err();
    match err {
      ApiError::Validation(issues) => assert!(issues.len() > 5),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn curriculum_rejects_unknown_pairs() {
    let state = AppState::for_tests();
    assert!(curriculum_lookup(&state, Some("7"), Some("1")).is_err());
    assert!(curriculum_lookup(&state, Some("3"), Some("5")).is_err());
    assert!(curriculum_lookup(&state, None, Some("1")).is_err());
    let out = curriculum_lookup(&state, Some("prep"), Some("2")).unwrap();
    assert_eq!(out.config.grade, GradeLevel::Prep);
    assert_eq!(out.number_range_presets, [10, 20]);
  }
}
