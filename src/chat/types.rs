use serde::{Deserialize, Serialize};

/// Only `user` and `assistant` are accepted from the wire; system messages
/// are added server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(skip_deserializing)]
    System,
    User,
    Assistant,
}

/// A message in the visible conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Monotonic within a session; never reused.
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// The role/content pair that goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: Role,
    pub content: String,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for ApiMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub messages: Vec<ApiMessage>,
}

/// Error body returned on the non-streaming path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Chat-completions request forwarded to the model gateway.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ApiMessage>,
    pub stream: bool,
}
