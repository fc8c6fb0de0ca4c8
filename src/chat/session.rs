use crate::chat::prompts::{upload_acknowledgement, WELCOME_MESSAGE};
use crate::chat::types::{ApiMessage, AskRequest, ChatMessage, Role};
use crate::error::{FinanceBuddyError, Result};
use crate::notice::Notice;
use log::{debug, warn};

/// Where a session is in its request cycle.
///
/// `Idle → Sending → Streaming → Idle`, with any failure returning straight
/// to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Sending,
    Streaming { placeholder: u64 },
}

/// The visible conversation plus the state of the in-flight request, if any.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: ChatState,
    next_id: u64,
    welcome_id: Option<u64>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session that opens with the assistant's welcome message.
    pub fn new() -> Self {
        let mut session = Self::empty();
        let id = session.push(Role::Assistant, WELCOME_MESSAGE.to_string());
        session.welcome_id = Some(id);
        session
    }

    /// A session with no welcome message.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            state: ChatState::Idle,
            next_id: 1,
            welcome_id: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state != ChatState::Idle
    }

    /// Everything except the welcome message, as sent to the backend.
    pub fn history(&self) -> Vec<ApiMessage> {
        self.messages
            .iter()
            .filter(|m| Some(m.id) != self.welcome_id)
            .map(ApiMessage::from)
            .collect()
    }

    /// Appends the user's message and returns the request to send. Returns
    /// `None`, changing nothing, for blank input or while a request is
    /// already in flight.
    pub fn begin(&mut self, text: &str) -> Option<AskRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.is_loading() {
            debug!("Ignoring message while a reply is in flight");
            return None;
        }

        self.push(Role::User, text.to_string());
        self.state = ChatState::Sending;
        Some(AskRequest {
            messages: self.history(),
        })
    }

    /// The backend accepted the request: add the empty assistant message the
    /// reply will stream into.
    pub fn start_streaming(&mut self) -> Result<u64> {
        if self.state != ChatState::Sending {
            return Err(FinanceBuddyError::NotSending);
        }
        let placeholder = self.push(Role::Assistant, String::new());
        self.state = ChatState::Streaming { placeholder };
        Ok(placeholder)
    }

    /// Appends streamed tokens to the reply. Returns the reply so far, or
    /// `None` when no reply is streaming.
    pub fn append_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Option<&str> {
        let ChatState::Streaming { placeholder } = self.state else {
            return None;
        };
        let message = self.messages.iter_mut().find(|m| m.id == placeholder)?;
        for token in tokens {
            message.content.push_str(token.as_ref());
        }
        Some(message.content.as_str())
    }

    /// The stream ended normally; the reply is frozen as is.
    pub fn complete(&mut self) -> Option<&ChatMessage> {
        let ChatState::Streaming { placeholder } = self.state else {
            return None;
        };
        self.state = ChatState::Idle;
        self.messages.iter().find(|m| m.id == placeholder)
    }

    /// Abandons the in-flight request. The placeholder, if one was created,
    /// is removed by id together with anything streamed into it.
    pub fn fail(&mut self, error: &FinanceBuddyError) -> Notice {
        warn!("Chat request failed: {}", error);
        if let ChatState::Streaming { placeholder } = self.state {
            self.messages.retain(|m| m.id != placeholder);
        }
        self.state = ChatState::Idle;
        error.notice()
    }

    /// Tells the user their upload was picked up.
    pub fn acknowledge_upload(&mut self, source_name: &str, rows: usize) -> &ChatMessage {
        let id = self.push(Role::Assistant, upload_acknowledgement(source_name, rows));
        let index = self.messages.len() - 1;
        debug_assert_eq!(self.messages[index].id, id);
        &self.messages[index]
    }

    fn push(&mut self, role: Role, content: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage { id, role, content });
        id
    }
}
