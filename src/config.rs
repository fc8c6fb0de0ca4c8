use crate::error::{FinanceBuddyError, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const BACKEND_URL_VAR: &str = "FINANCE_BUDDY_BACKEND_URL";
pub const API_KEY_VAR: &str = "AI_GATEWAY_API_KEY";
pub const GATEWAY_URL_VAR: &str = "AI_GATEWAY_URL";
pub const MODEL_VAR: &str = "AI_GATEWAY_MODEL";
pub const BIND_VAR: &str = "FINANCE_BUDDY_BIND";
pub const CONTEXT_CSV_VAR: &str = "FINANCE_BUDDY_CONTEXT_CSV";

pub const ASK_PATH: &str = "/api/ask";
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Where the chat client sends its requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            backend_url: non_empty_var(BACKEND_URL_VAR).unwrap_or_default(),
        }
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// The backend base URL with trailing slashes removed, plus `/api/ask`.
    /// An empty base yields the bare path.
    pub fn chat_url(&self) -> String {
        format!("{}{}", self.backend_url.trim_end_matches('/'), ASK_PATH)
    }
}

/// Settings for the chat proxy server.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    /// Checked per request rather than at start-up.
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    /// CSV whose first transactions are added to the system prompt.
    pub context_csv: Option<PathBuf>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            context_csv: None,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let bind_addr = match non_empty_var(BIND_VAR) {
            Some(raw) => raw.parse().map_err(|e| {
                FinanceBuddyError::Config(format!("{} '{}': {}", BIND_VAR, raw, e))
            })?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            api_key: non_empty_var(API_KEY_VAR),
            gateway_url: non_empty_var(GATEWAY_URL_VAR).unwrap_or(defaults.gateway_url),
            model: non_empty_var(MODEL_VAR).unwrap_or(defaults.model),
            bind_addr,
            context_csv: non_empty_var(CONTEXT_CSV_VAR).map(PathBuf::from),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_context_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.context_csv = Some(path.into());
        self
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.gateway_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_strips_trailing_slashes() {
        let config = ClientConfig::default().with_backend_url("http://localhost:8000///");
        assert_eq!(config.chat_url(), "http://localhost:8000/api/ask");
        assert_eq!(ClientConfig::default().chat_url(), "/api/ask");
    }

    #[test]
    fn test_proxy_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
        assert_eq!(
            config.completions_url(),
            "https://ai.gateway.lovable.dev/v1/chat/completions"
        );
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builders_override() {
        let config = ProxyConfig::default()
            .with_api_key("secret")
            .with_gateway_url("http://127.0.0.1:9000/")
            .with_model("test-model")
            .with_context_csv("data/sample.csv");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.completions_url(), "http://127.0.0.1:9000/v1/chat/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.context_csv, Some(PathBuf::from("data/sample.csv")));
    }
}
