//! Elia core: conversation flow, product normalization, local knowledge
//! base, and the remote model pipeline.
//!
//! The entry point is [`Session`]: feed it user turns, render the messages
//! it returns. Everything below it (extraction, resolution, retry, safety
//! net) is public for the CLI and for tests.

pub mod config;
pub mod dialogue;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod interaction;
pub mod jsonx;
pub mod kb;
pub mod model;
pub mod normalize;
pub mod profile;
pub mod prompt;
pub mod resolver;
pub mod retry;
pub mod session;
pub mod severity;
pub mod stage;
pub mod synonyms;
pub mod transcript;

pub use config::EliaConfig;
pub use error::EliaError;
pub use interaction::{InteractionResult, Recommendation, SourceRef};
pub use kb::KnowledgeBase;
pub use model::{FakeModelClient, HttpModelClient, ModelClient, ModelError, Prompt};
pub use profile::UserProfile;
pub use resolver::{Outcome, Resolver};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use session::Session;
pub use severity::Severity;
pub use stage::ConversationStage;
pub use synonyms::SynonymTable;
pub use transcript::{Message, Sender, Transcript};
