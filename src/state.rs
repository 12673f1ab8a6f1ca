//! Application state: service settings, the document renderer and the
//! optional persistence sink. Built once at start-up and shared as `Arc<AppState>`.

use tracing::{info, instrument};

use crate::config::{load_service_config_from_env, ServiceConfig};
use crate::persist::SupabaseSink;
use crate::render::PdfRenderer;

#[derive(Clone)]
pub struct AppState {
    pub settings: ServiceConfig,
    pub renderer: PdfRenderer,
    pub sink: Option<SupabaseSink>,
}

impl AppState {
    /// Build state from env: load TOML settings, init the Supabase sink.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let settings = load_service_config_from_env().unwrap_or_default();

        let sink = SupabaseSink::from_env();
        if let Some(s) = &sink {
            info!(target: "mathsheet_backend", url = %s.base_url, table = %s.table, "Supabase persistence enabled.");
        } else {
            info!(target: "mathsheet_backend", "Supabase persistence disabled (no URL or key).");
        }

        Self::with_parts(settings, sink)
    }

    pub fn with_parts(settings: ServiceConfig, sink: Option<SupabaseSink>) -> Self {
        let renderer = PdfRenderer::new(settings.document.clone());
        Self { settings, renderer, sink }
    }
}

#[cfg(test)]
impl AppState {
    /// Default settings, persistence disabled.
    pub fn for_tests() -> Self {
        Self::with_parts(ServiceConfig::default(), None)
    }
}
