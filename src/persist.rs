//! Best-effort persistence of generation records to a Supabase (PostgREST) table.
//!
//! Writes are fire-and-forget: `spawn_persist` detaches a task, logs the
//! outcome, and never reports back to the response path.
//!
//! NOTE: We never log the API key.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::domain::WorksheetRecord;
use crate::error::PersistError;

#[derive(Clone)]
pub struct SupabaseSink {
  pub client: reqwest::Client,
  pub base_url: String,
  pub api_key: String,
  pub table: String,
}

impl SupabaseSink {
  /// Construct the sink if both a project URL and a key are set; otherwise return None.
  ///
  /// The service-role key is preferred over the anon key.
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("SUPABASE_URL")
      .or_else(|_| std::env::var("NEXT_PUBLIC_SUPABASE_URL"))
      .ok()?;
    let api_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
      .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
      .ok()?;
    let table = std::env::var("SUPABASE_TABLE").unwrap_or_else(|_| "worksheets".into());
    Self::new(base_url, api_key, table)
  }

  pub fn new(base_url: String, api_key: String, table: String) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;
    Some(Self { client, base_url: base_url.trim_end_matches('/').to_string(), api_key, table })
  }

  pub fn endpoint(&self) -> String {
    format!("{}/rest/v1/{}", self.base_url, self.table)
  }

  /// Insert one row.
  #[instrument(level = "info", skip(self, record), fields(table = %self.table, seed = %record.seed))]
  pub async fn insert(&self, record: &WorksheetRecord) -> Result<(), PersistError> {
    let res = self.client.post(self.endpoint())
      .header(USER_AGENT, "mathsheet-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("apikey", &self.api_key)
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .header("Prefer", "return=minimal")
      .json(record)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      return Err(PersistError::Status { status, body: extract_postgrest_error(&body).unwrap_or(body) });
    }
    Ok(())
  }
}

/// Try to extract a clean error message from a PostgREST error body.
fn extract_postgrest_error(body: &str) -> Option<String> {
  #[derive(serde::Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EObj>(body).ok().map(|e| e.message)
}

/// Persist in the background. Failures are logged, never propagated.
pub fn spawn_persist(sink: Option<SupabaseSink>, record: WorksheetRecord) -> Option<JoinHandle<()>> {
  let Some(sink) = sink else {
    warn!(target: "worksheet", seed = %record.seed, "Persistence disabled (Supabase credentials missing)");
    return None;
  };
  Some(tokio::spawn(async move {
    match sink.insert(&record).await {
      Ok(()) => info!(target: "worksheet", seed = %record.seed, questions = record.question_count, "Worksheet record saved"),
      Err(e) => error!(target: "worksheet", seed = %record.seed, error = %e, "Failed to persist worksheet"),
    }
  }))
}
