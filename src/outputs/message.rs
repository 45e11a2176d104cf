use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// The one message type sent to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub is_loading: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), is_loading: false }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), is_loading: false }
    }

    /// Placeholder shown while a collaborator call is in flight.
    pub fn loading(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), is_loading: true }
    }
}

/// Receives progress messages (user echo, loading placeholders) during a turn.
pub trait MessageSink: Send + Sync {
    fn emit(&self, message: ChatMessage);
}

/// Keeps every emitted message in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<ChatMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl MessageSink for RecordingSink {
    fn emit(&self, message: ChatMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}
