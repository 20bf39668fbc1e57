/// LLM Client: the single point of entry for all Claude API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// One attempt per call. Callers that can degrade (the analysis orchestrator)
/// fall back instead of retrying.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls. Hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Sampling parameters for a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API with structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
        })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        sampling: Sampling,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        sampling: Sampling,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, sampling).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process stand-in for the Messages API, bound to an ephemeral port.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[derive(Clone)]
    struct StubState {
        status: StatusCode,
        body: Value,
        hits: Arc<AtomicUsize>,
        last_request: Arc<Mutex<Option<Value>>>,
    }

    pub struct StubServer {
        pub url: String,
        pub hits: Arc<AtomicUsize>,
        pub last_request: Arc<Mutex<Option<Value>>>,
    }

    impl StubServer {
        pub fn hit_count(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<Value> {
            self.last_request.lock().unwrap().clone()
        }
    }

    /// A successful Messages API body whose single text block is `text`.
    pub fn text_response(text: &str) -> Value {
        json!({
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 120, "output_tokens": 80}
        })
    }

    async fn respond(State(state): State<StubState>, Json(req): Json<Value>) -> (StatusCode, Json<Value>) {
        state.hits.fetch_add(1, Ordering::SeqCst);
        *state.last_request.lock().unwrap() = Some(req);
        (state.status, Json(state.body.clone()))
    }

    pub async fn spawn_stub(status: StatusCode, body: Value) -> StubServer {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_request = Arc::new(Mutex::new(None));
        let state = StubState {
            status,
            body,
            hits: hits.clone(),
            last_request: last_request.clone(),
        };
        let app = Router::new().route("/v1/messages", post(respond)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer {
            url: format!("http://{addr}/v1/messages"),
            hits,
            last_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{spawn_stub, text_response};
    use super::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    const SAMPLING: Sampling = Sampling {
        temperature: 0.3,
        max_tokens: 2500,
    };

    fn client_for(url: &str) -> LlmClient {
        LlmClient::new("sk-test".to_string(), url.to_string(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_text_skips_non_text_blocks() {
        let response: LlmResponse = serde_json::from_value(json!({
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "hello"}
            ],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("hello"));
    }

    #[tokio::test]
    async fn test_call_json_parses_fenced_text() {
        let stub = spawn_stub(StatusCode::OK, text_response("```json\n{\"score\": 81}\n```")).await;

        let value: Value = client_for(&stub.url)
            .call_json("prompt", "system", SAMPLING)
            .await
            .unwrap();

        assert_eq!(value["score"], 81);
    }

    #[tokio::test]
    async fn test_request_carries_sampling_and_system() {
        let stub = spawn_stub(StatusCode::OK, text_response("{}")).await;

        let _: Value = client_for(&stub.url)
            .call_json("the prompt", "the system", SAMPLING)
            .await
            .unwrap();

        let sent = stub.last_request().unwrap();
        assert_eq!(sent["model"], MODEL);
        assert_eq!(sent["max_tokens"], 2500);
        assert!((sent["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(sent["system"], "the system");
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["messages"][0]["content"], "the prompt");
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let stub = spawn_stub(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"error": {"message": "overloaded"}}),
        )
        .await;

        let err = client_for(&stub.url)
            .call("prompt", "system", SAMPLING)
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(stub.hit_count(), 1);
    }

    #[tokio::test]
    async fn test_non_json_text_is_parse_error() {
        let stub = spawn_stub(StatusCode::OK, text_response("Sure! Here is my analysis.")).await;

        let err = client_for(&stub.url)
            .call_json::<Value>("prompt", "system", SAMPLING)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_text_block_is_empty_content() {
        let stub = spawn_stub(
            StatusCode::OK,
            json!({"content": [], "usage": {"input_tokens": 1, "output_tokens": 0}}),
        )
        .await;

        let err = client_for(&stub.url)
            .call_json::<Value>("prompt", "system", SAMPLING)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}/v1/messages"))
            .call("prompt", "system", SAMPLING)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Http(_)));
    }
}
