//! Conversation transcript: ordered, append-only message log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interaction::InteractionResult;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::Bot => write!(f, "bot"),
            Sender::User => write!(f, "user"),
        }
    }
}

/// One transcript entry. Carries either plain text or a structured verdict,
/// never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<InteractionResult>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            text: Some(text.into()),
            analysis: None,
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: Some(text.into()),
            analysis: None,
            sent_at: Utc::now(),
        }
    }

    /// Bot message carrying a structured interaction verdict.
    pub fn bot_analysis(result: InteractionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            text: None,
            analysis: Some(result),
            sent_at: Utc::now(),
        }
    }
}

/// Append-only message log for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
