#[cfg(feature = "client")]
pub mod client;
pub mod prompts;
pub mod session;
pub mod sse;
pub mod transport;
pub mod types;

#[cfg(feature = "client")]
pub use client::ChatClient;
pub use prompts::{
    system_prompt_with_context, upload_acknowledgement, SUGGESTED_QUESTIONS, SYSTEM_PROMPT,
    WELCOME_MESSAGE,
};
pub use session::{ChatSession, ChatState};
pub use sse::{decode_all, EventStreamDecoder};
pub use transport::{status_error, stream_reply};
pub use types::{ApiMessage, AskRequest, ChatMessage, ErrorBody, GatewayRequest, Role};
