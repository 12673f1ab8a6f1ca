//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Worksheet bodies are not listed here: they are validated from raw JSON
//! (see `validation`) and answered with `WorksheetPayload` or PDF bytes.

use serde::{Deserialize, Serialize};

use crate::domain::WorksheetConfig;

/// Seed actually used for a generated worksheet.
pub const SEED_HEADER: &str = "x-worksheet-seed";

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// `GET /api/curriculum?grade=3&term=2`. Both values arrive as strings so
/// that unknown ones become a 400 with a readable message.
#[derive(Debug, Deserialize)]
pub struct CurriculumQuery {
    pub grade: Option<String>,
    pub term: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumOut {
    pub config: WorksheetConfig,
    pub number_range_presets: [i64; 2],
}
