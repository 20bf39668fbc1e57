//! Remote Analyzer: asks the LLM for a structured analysis of the resume text.
//!
//! Returns the raw JSON object. Repairing missing or malformed fields is the
//! orchestrator's job (see `normalize`); this module only guarantees that the
//! response parsed as a JSON object.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::llm_client::{LlmClient, LlmError, Sampling};

/// Low temperature keeps the schema stable; the token cap bounds cost.
pub const ANALYSIS_SAMPLING: Sampling = Sampling {
    temperature: 0.3,
    max_tokens: 2500,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM backend failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Remote analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed remote payload: {0}")]
    MalformedPayload(String),
}

/// A source of remote analysis payloads.
///
/// The orchestrator holds an `Arc<dyn AnalysisBackend>` so tests (and future
/// providers) can stand in for the LLM.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    async fn fetch_analysis(&self, resume_text: &str) -> Result<Map<String, Value>, AnalysisError>;
}

/// LLM-backed analyzer. One request per call, no retries.
pub struct RemoteAnalyzer {
    llm: LlmClient,
}

impl RemoteAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnalysisBackend for RemoteAnalyzer {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn fetch_analysis(&self, resume_text: &str) -> Result<Map<String, Value>, AnalysisError> {
        let prompt = build_prompt(resume_text);
        let value: Value = self
            .llm
            .call_json(&prompt, ANALYSIS_SYSTEM, ANALYSIS_SAMPLING)
            .await?;
        into_object(value)
    }
}

fn build_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}

fn into_object(value: Value) -> Result<Map<String, Value>, AnalysisError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AnalysisError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
