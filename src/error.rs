//! Error types for each concern, plus the HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Raised by the PRNG adapter when an integer range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
  #[error("invalid range: high ({high}) < low ({low})")]
  InvalidRange { low: i64, high: i64 },
}

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("worksheet has no questions to render")]
  Empty,
  #[error("failed to write document: {0}")]
  Write(#[from] std::fmt::Error),
}

#[derive(Debug, Error)]
pub enum PersistError {
  #[error("persistence request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("persistence backend returned HTTP {status}: {body}")]
  Status { status: u16, body: String },
}

/// One failing field from request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
  pub path: String,
  pub message: String,
}

impl ValidationIssue {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

/// Everything the HTTP boundary can answer with besides success.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Invalid JSON payload")]
  Malformed(String),
  #[error("Invalid configuration")]
  Validation(Vec<ValidationIssue>),
  #[error("{0}")]
  BadRequest(String),
  #[error("Failed to generate worksheet")]
  Generation(#[from] RangeError),
  #[error("Failed to generate PDF")]
  Render(#[from] RenderError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Malformed(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Generation(_) | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      ApiError::Malformed(detail) => json!({ "error": self.to_string(), "detail": detail }),
      ApiError::Validation(issues) => json!({ "error": self.to_string(), "issues": issues }),
      ApiError::BadRequest(_) => json!({ "error": self.to_string() }),
      ApiError::Generation(e) => json!({ "error": self.to_string(), "detail": e.to_string() }),
      ApiError::Render(e) => json!({ "error": self.to_string(), "detail": e.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
