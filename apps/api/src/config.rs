use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;

const DEFAULT_PORT: u16 = 5767;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which analysis backend the orchestrator may consult.
/// `Disabled` is a normal operating mode: every request goes to the heuristic analyzer.
#[derive(Clone)]
pub enum BackendConfig {
    Disabled,
    Anthropic {
        api_key: String,
        api_url: String,
        timeout: Duration,
    },
}

impl BackendConfig {
    /// A blank or missing key disables the remote backend.
    pub fn from_parts(api_key: Option<String>, api_url: String, timeout: Duration) -> Self {
        match api_key.map(|k| k.trim().to_string()) {
            Some(api_key) if !api_key.is_empty() => BackendConfig::Anthropic {
                api_key,
                api_url,
                timeout,
            },
            _ => BackendConfig::Disabled,
        }
    }
}

// Hand-written so the API key never lands in logs.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendConfig::Disabled => f.write_str("Disabled"),
            BackendConfig::Anthropic {
                api_url, timeout, ..
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"<redacted>")
                .field("api_url", api_url)
                .field("timeout", timeout)
                .finish(),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Nothing is required: without `ANTHROPIC_API_KEY` the service runs heuristic-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub backend: BackendConfig,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = parse_env_or("LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            port: parse_env_or("PORT", DEFAULT_PORT).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            backend: BackendConfig::from_parts(
                std::env::var("ANTHROPIC_API_KEY").ok(),
                std::env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                Duration::from_secs(timeout_secs),
            ),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
        })
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_disables_backend() {
        let backend = BackendConfig::from_parts(None, DEFAULT_API_URL.to_string(), Duration::from_secs(5));
        assert!(matches!(backend, BackendConfig::Disabled));
    }

    #[test]
    fn test_blank_key_disables_backend() {
        let backend = BackendConfig::from_parts(
            Some("   ".to_string()),
            DEFAULT_API_URL.to_string(),
            Duration::from_secs(5),
        );
        assert!(matches!(backend, BackendConfig::Disabled));
    }

    #[test]
    fn test_present_key_enables_backend_and_trims() {
        let backend = BackendConfig::from_parts(
            Some(" sk-test \n".to_string()),
            "http://localhost:9999/v1/messages".to_string(),
            Duration::from_secs(7),
        );
        match backend {
            BackendConfig::Anthropic {
                api_key,
                api_url,
                timeout,
            } => {
                assert_eq!(api_key, "sk-test");
                assert_eq!(api_url, "http://localhost:9999/v1/messages");
                assert_eq!(timeout, Duration::from_secs(7));
            }
            BackendConfig::Disabled => panic!("expected an enabled backend"),
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = BackendConfig::from_parts(
            Some("sk-secret".to_string()),
            DEFAULT_API_URL.to_string(),
            Duration::from_secs(5),
        );
        let rendered = format!("{backend:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_default_origins_cover_local_frontend() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 2);
        assert!(origins.iter().all(|o| o.ends_with(":5173")));
    }
}
