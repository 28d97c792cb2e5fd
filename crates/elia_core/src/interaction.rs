//! Interaction verdict model.
//!
//! The shape shared by the local knowledge base and the remote model:
//! parsing is deliberately tolerant (every field except the severity level
//! defaults to empty) so a partial payload still yields a displayable
//! verdict once the level has been validated upstream.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A cited reference backing a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Timing advice and optional substitution suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub alternative: String,
}

/// Full interaction verdict for one product against one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub level: Severity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub scientific_basis: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub contraception_impact: String,
    #[serde(default)]
    pub recommendation: Recommendation,
}

impl SourceRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
