//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.
//!
//! Worksheet handlers take the raw body so that malformed JSON is a 400 from
//! our own error type rather than axum's extractor rejection.

use std::sync::Arc;
use axum::{
  body::Bytes,
  extract::{Query, State},
  http::{header, HeaderValue},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

/// Attach the seed header when the seed is a legal header value.
fn with_seed(mut res: Response, seed: &str) -> Response {
  match HeaderValue::from_str(seed) {
    Ok(v) => {
      res.headers_mut().insert(SEED_HEADER, v);
    }
    Err(_) => warn!(target: "worksheet", "Seed not representable as a header; omitted"),
  }
  res
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(body_len = body.len()))]
pub async fn http_post_worksheet(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Response, ApiError> {
  let (payload, doc) = worksheet_document(&state, &body)?;
  info!(target: "worksheet", seed = %payload.config.seed, filename = %doc.filename, "HTTP worksheet served");
  let res = (
    [
      (header::CONTENT_TYPE, doc.content_type.to_string()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename={}", doc.filename)),
    ],
    doc.bytes,
  )
    .into_response();
  Ok(with_seed(res, &payload.config.seed))
}

#[instrument(level = "info", skip(body), fields(body_len = body.len()))]
pub async fn http_post_preview(body: Bytes) -> Result<Response, ApiError> {
  let payload = preview_worksheet(&body)?;
  let seed = payload.config.seed.clone();
  Ok(with_seed(Json(payload).into_response(), &seed))
}

#[instrument(level = "info", skip(state), fields(grade = ?q.grade, term = ?q.term))]
pub async fn http_get_curriculum(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CurriculumQuery>,
) -> Result<Json<CurriculumOut>, ApiError> {
  let out = curriculum_lookup(&state, q.grade.as_deref(), q.term.as_deref())?;
  Ok(Json(out))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
  };
  use serde_json::{json, Value};
  use tower::ServiceExt;

  use crate::routes::build_router;
  use crate::state::AppState;

  fn app() -> Router {
    build_router(Arc::new(AppState::for_tests()))
  }

  fn config_body() -> Value {
    json!({
      "grade": "2", "term": 3, "topic": "number", "operations": ["addition", "subtraction"],
      "minOperand": 0, "maxOperand": 99, "operandsPerQuestion": 2, "format": "vertical",
      "questionCount": 10, "allowCarrying": false, "allowBorrowing": false,
      "includeWordProblems": true, "includeTimeLimit": false, "difficultyMode": "curriculum",
      "seed": "router-seed"
    })
  }

  fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri).header("content-type", "application/json").body(body.into()).unwrap()
  }

  async fn json_body(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn health_is_ok() {
    let res = app().oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "ok": true }));
  }

  #[tokio::test]
  async fn worksheet_returns_pdf_with_headers() {
    let res = app().oneshot(post("/api/worksheet", config_body().to_string())).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let h = res.headers();
    assert_eq!(h["content-type"], "application/pdf");
    assert_eq!(h["content-disposition"], "attachment; filename=worksheet-2-3.pdf");
    assert_eq!(h["x-worksheet-seed"], "router-seed");
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
  }

  #[tokio::test]
  async fn preview_is_deterministic() {
    let a = app().oneshot(post("/api/worksheet/preview", config_body().to_string())).await.unwrap();
    assert_eq!(a.headers()["x-worksheet-seed"], "router-seed");
    let a = json_body(a).await;
    let b = json_body(app().oneshot(post("/api/worksheet/preview", config_body().to_string())).await.unwrap()).await;
    assert_eq!(a["questions"], b["questions"]);
    assert_eq!(a["questions"].as_array().unwrap().len(), 10);
    assert_eq!(a["questions"][4]["format"], "word");
  }

  #[tokio::test]
  async fn malformed_json_is_400() {
    let res = app().oneshot(post("/api/worksheet", "{oops")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "Invalid JSON payload");
  }

  #[tokio::test]
  async fn invalid_config_is_422_with_issues() {
    let mut body = config_body();
    body["questionCount"] = json!(3);
    body["grade"] = json!("9");
    let res = app().oneshot(post("/api/worksheet", body.to_string())).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v = json_body(res).await;
    assert_eq!(v["error"], "Invalid configuration");
    assert_eq!(v["issues"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn inverted_range_is_422() {
    let mut body = config_body();
    body["minOperand"] = json!(50);
    body["maxOperand"] = json!(10);
    let res = app().oneshot(post("/api/worksheet/preview", body.to_string())).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(res).await["issues"][0]["message"], "minOperand must be less than maxOperand");
  }

  #[tokio::test]
  async fn curriculum_lookup() {
    let res = app()
      .oneshot(Request::get("/api/curriculum?grade=4&term=2").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let v = json_body(res).await;
    assert_eq!(v["config"]["grade"], "4");
    assert_eq!(v["config"]["term"], 2);
    assert_eq!(v["numberRangePresets"], json!([100, 1000]));

    let bad = app()
      .oneshot(Request::get("/api/curriculum?grade=4&term=8").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
  }
}
