use crate::chat::session::ChatSession;
use crate::chat::transport::{status_error, stream_reply};
use crate::config::ClientConfig;
use crate::error::{FinanceBuddyError, Result};
use log::{debug, error};
use reqwest::Client;

/// Sends chat turns to the backend's `/api/ask` endpoint and streams the
/// reply into a [`ChatSession`].
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.chat_url(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `text` and waits for the full reply.
    ///
    /// Returns `Ok(None)` when the session ignored the input (blank text or
    /// a reply already in flight).
    pub async fn send(&self, session: &mut ChatSession, text: &str) -> Result<Option<String>> {
        self.send_with(session, text, |_| {}).await
    }

    /// Like [`ChatClient::send`], reporting each token as it arrives.
    pub async fn send_with<F>(
        &self,
        session: &mut ChatSession,
        text: &str,
        on_token: F,
    ) -> Result<Option<String>>
    where
        F: FnMut(&str),
    {
        let Some(request) = session.begin(text) else {
            return Ok(None);
        };
        debug!(
            "POST {} with {} messages",
            self.endpoint,
            request.messages.len()
        );

        let response = match self.client.post(&self.endpoint).json(&request).send().await {
            Ok(response) => response,
            Err(e) => return Err(abandon(session, e.into())),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(abandon(session, status_error(status.as_u16(), &body)));
        }

        stream_reply(session, response.bytes_stream(), on_token)
            .await
            .map(Some)
    }
}

fn abandon(session: &mut ChatSession, err: FinanceBuddyError) -> FinanceBuddyError {
    error!("Chat request to backend failed: {}", err);
    session.fail(&err);
    err
}
