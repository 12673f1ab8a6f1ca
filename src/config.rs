//! Loading service configuration (document settings + curriculum overrides) from TOML.
//!
//! See `ServiceConfig` and `DocumentSettings` for expected schema. Example:
//!
//! ```toml
//! [document]
//! title = "Maths Practice"
//! author = "Room 4B"
//! answer_key = true
//!
//! [[curriculum]]
//! grade = "prep"
//! term = 1
//! maxOperand = 5
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::curriculum::CurriculumOverride;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServiceConfig {
  #[serde(default)]
  pub document: DocumentSettings,
  #[serde(default)]
  pub curriculum: Vec<CurriculumOverride>,
}

/// Text and layout choices for rendered worksheets.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
  pub title: String,
  pub author: String,
  /// Append answer-key pages after the questions.
  pub answer_key: bool,
}

impl Default for DocumentSettings {
  fn default() -> Self {
    Self {
      title: "Math Worksheet".into(),
      author: "MathSheet".into(),
      answer_key: true,
    }
  }
}

pub fn parse_service_config(s: &str) -> Result<ServiceConfig, toml::de::Error> {
  toml::from_str::<ServiceConfig>(s)
}

/// Attempt to load `ServiceConfig` from WORKSHEET_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_service_config_from_env() -> Option<ServiceConfig> {
  let path = std::env::var("WORKSHEET_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_service_config(&s) {
      Ok(cfg) => {
        info!(target: "mathsheet_backend", %path, overrides = cfg.curriculum.len(), "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "mathsheet_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "mathsheet_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
