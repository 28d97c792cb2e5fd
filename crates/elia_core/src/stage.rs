//! Conversation stages.

use serde::{Deserialize, Serialize};

/// Where the conversation stands. Transitions only move forward, except
/// that each resolution returns from `Processing` to `AwaitingProduct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    Greeting,
    AwaitingContraception,
    AwaitingProduct,
    Processing,
}

impl ConversationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::Greeting => "greeting",
            ConversationStage::AwaitingContraception => "awaiting_contraception",
            ConversationStage::AwaitingProduct => "awaiting_product",
            ConversationStage::Processing => "processing",
        }
    }
}

impl std::fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
