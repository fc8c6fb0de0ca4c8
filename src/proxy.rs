//! HTTP proxy between the chat client and an OpenAI-compatible model gateway.
//!
//! `POST /api/ask` prepends the system prompt to the client's messages,
//! forwards them upstream with `stream: true`, and relays the event stream
//! back unchanged. Failures come back as `{"error": "..."}`.

use crate::chat::prompts::system_prompt_with_context;
use crate::chat::types::{ApiMessage, AskRequest, ErrorBody, GatewayRequest};
use crate::config::{ProxyConfig, API_KEY_VAR, ASK_PATH};
use crate::error::{FinanceBuddyError, Result};
use crate::ingestion::load_table;
use crate::normalizer::normalize;
use crate::store::{context_lines, CONTEXT_TRANSACTION_LIMIT};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const HEALTH_STATUS: &str = "Finance Buddy chat proxy running";

#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    config: Arc<ProxyConfig>,
    system_prompt: Arc<String>,
}

impl ProxyState {
    pub fn new(config: ProxyConfig, system_prompt: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
            system_prompt: Arc::new(system_prompt),
        }
    }

    /// Builds the state, loading the context CSV when one is configured.
    pub fn from_config(config: ProxyConfig) -> Result<Self> {
        let lines = match &config.context_csv {
            Some(path) => {
                let table = load_table(path)?;
                let transactions = normalize(&table);
                info!(
                    "Using {} of {} transactions from {} as chat context",
                    transactions.len().min(CONTEXT_TRANSACTION_LIMIT),
                    transactions.len(),
                    table.source_name()
                );
                context_lines(&transactions, CONTEXT_TRANSACTION_LIMIT)
            }
            None => Vec::new(),
        };
        let prompt = system_prompt_with_context(&lines);
        Ok(Self::new(config, prompt))
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// An error answered as `{"error": message}`.
#[derive(Debug)]
pub struct ProxyError {
    status: StatusCode,
    message: String,
}

impl ProxyError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// What the client is told when the gateway refuses a request.
    fn from_gateway_status(status: StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Please try again in a moment.",
            ),
            402 => Self::new(
                StatusCode::PAYMENT_REQUIRED,
                "Usage limit reached. Please add credits to continue.",
            ),
            _ => Self::internal("Failed to get AI response"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<FinanceBuddyError> for ProxyError {
    fn from(err: FinanceBuddyError) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", get(health))
        .route(ASK_PATH, post(ask))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": HEALTH_STATUS }))
}

async fn ask(
    State(state): State<ProxyState>,
    body: Bytes,
) -> std::result::Result<Response, ProxyError> {
    let request: AskRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejecting malformed chat request: {}", e);
        ProxyError::from(FinanceBuddyError::from(e))
    })?;

    let api_key = state.config.api_key.as_deref().ok_or_else(|| {
        error!("{} is not configured", API_KEY_VAR);
        ProxyError::internal(format!("{} is not configured", API_KEY_VAR))
    })?;

    info!(
        "Processing financial chat request with {} messages",
        request.messages.len()
    );

    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(ApiMessage::system(state.system_prompt.as_str()));
    messages.extend(request.messages);
    let payload = GatewayRequest {
        model: &state.config.model,
        messages,
        stream: true,
    };

    let upstream = state
        .http
        .post(state.config.completions_url())
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            error!("AI gateway unreachable: {}", e);
            ProxyError::internal(e.to_string())
        })?;

    let status = upstream.status();
    if !status.is_success() {
        let text = upstream.text().await.unwrap_or_default();
        error!("AI gateway error: {} {}", status, text);
        return Err(ProxyError::from_gateway_status(status));
    }

    info!("Streaming response from AI gateway");
    Ok((
        [(header::CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    let addr = config.bind_addr;
    let state = ProxyState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Chat proxy listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
