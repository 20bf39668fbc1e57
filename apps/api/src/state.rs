use std::sync::Arc;

use crate::analysis::orchestrator::AnalysisOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless; shared by every in-flight request without locking.
    pub analyzer: Arc<AnalysisOrchestrator>,
    /// Request body cap for uploads.
    pub max_upload_bytes: usize,
}
