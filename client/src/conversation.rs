//! Conversation transcript
//!
//! Defines messages and the append-only store that holds them.

use serde::{Deserialize, Serialize};

/// Greeting every session starts with
pub const GREETING: &str =
    "Hello! I am Medify, your Agentic AI assistant. How can I help you today?";

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user
    User,
    /// Message produced by the assistant (backend reply or client-side notice)
    Assistant,
}

impl Role {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single transcript entry
///
/// Messages are never modified after they are appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent the message
    pub role: Role,
    /// Text shown in the transcript
    pub content: String,
    /// Backend agent that produced the message, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_agent: Option<String>,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            origin_agent: None,
        }
    }

    /// Create an assistant message with no origin agent
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            origin_agent: None,
        }
    }

    /// Tag the message with the agent that produced it
    pub fn from_agent(mut self, agent: Option<impl Into<String>>) -> Self {
        self.origin_agent = agent.map(Into::into);
        self
    }
}

/// Append-only ordered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::initial_state()
    }
}

impl ConversationStore {
    /// Transcript seeded with the assistant greeting
    pub fn initial_state() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    /// Add a message to the end of the transcript and return the new sequence
    pub fn append(&mut self, message: Message) -> &[Message] {
        self.messages.push(message);
        &self.messages
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages in the transcript
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty (never true for a seeded store)
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
