//! Analysis Orchestrator: picks the remote or heuristic strategy per request.
//!
//! `analyze` never fails. With no backend configured it goes straight to the
//! heuristic analyzer; otherwise it makes one bounded remote attempt and falls
//! back to the heuristic analyzer on any error or timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::analysis::heuristic::HeuristicAnalyzer;
use crate::analysis::models::AnalysisResult;
use crate::analysis::normalize::normalize_remote_payload;
use crate::analysis::remote::{AnalysisBackend, AnalysisError, RemoteAnalyzer};
use crate::config::BackendConfig;
use crate::llm_client::{LlmClient, LlmError};

pub struct AnalysisOrchestrator {
    backend: Option<Arc<dyn AnalysisBackend>>,
    heuristic: HeuristicAnalyzer,
    timeout: Duration,
}

impl AnalysisOrchestrator {
    /// Builds the orchestrator from configuration.
    /// `BackendConfig::Disabled` yields a heuristic-only orchestrator.
    pub fn from_config(config: &BackendConfig) -> Result<Self, LlmError> {
        match config {
            BackendConfig::Disabled => Ok(Self::heuristic_only()),
            BackendConfig::Anthropic {
                api_key,
                api_url,
                timeout,
            } => {
                let llm = LlmClient::new(api_key.clone(), api_url.clone(), *timeout)?;
                Ok(Self::with_backend(Arc::new(RemoteAnalyzer::new(llm)), *timeout))
            }
        }
    }

    pub fn heuristic_only() -> Self {
        Self {
            backend: None,
            heuristic: HeuristicAnalyzer,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_backend(backend: Arc<dyn AnalysisBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            heuristic: HeuristicAnalyzer,
            timeout,
        }
    }

    /// "remote" when a backend is configured, "heuristic" otherwise.
    pub fn mode(&self) -> &'static str {
        if self.backend.is_some() {
            "remote"
        } else {
            "heuristic"
        }
    }

    pub async fn analyze(&self, resume_text: &str) -> AnalysisResult {
        let Some(backend) = &self.backend else {
            info!("No analysis backend configured, using heuristic analysis");
            return self.heuristic.analyze(resume_text);
        };

        match self.analyze_remote(backend.as_ref(), resume_text).await {
            Ok(result) => {
                info!(backend = backend.name(), score = result.score, "Remote analysis completed");
                result
            }
            Err(e) => {
                warn!(
                    backend = backend.name(),
                    "Remote analysis failed, falling back to heuristic analysis: {e}"
                );
                self.heuristic.analyze(resume_text)
            }
        }
    }

    async fn analyze_remote(
        &self,
        backend: &dyn AnalysisBackend,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        debug!(chars = resume_text.len(), "Requesting remote analysis");

        let payload = tokio::time::timeout(self.timeout, backend.fetch_analysis(resume_text))
            .await
            .map_err(|_| AnalysisError::Timeout(self.timeout))??;

        normalize_remote_payload(&payload)
            .map_err(|e| AnalysisError::MalformedPayload(e.to_string()))
    }
}
