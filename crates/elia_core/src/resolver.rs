//! Product resolution pipeline.
//!
//! Local knowledge base first, remote model second, then the safety net
//! and profile adaptation over whatever came back. Every failure mode
//! degrades to a user-facing notice; the resolver never errors out.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dialogue;
use crate::interaction::InteractionResult;
use crate::kb::KnowledgeBase;
use crate::model::{ModelClient, ModelError};
use crate::normalize::normalize_product;
use crate::profile::UserProfile;
use crate::prompt::build_prompt;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::synonyms::SynonymTable;

/// Appended to the impact text for continuous-delivery methods, where
/// spacing intakes is not an available mitigation.
pub const CONTINUOUS_CAVEAT: &str =
    " Avec une méthode à diffusion continue (implant, patch, anneau, stérilet), cette \
     vigilance s'applique sur toute la durée du dispositif.";

/// What one resolution produced: a displayable verdict, or a notice
/// explaining why there is none.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Verdict(Box<InteractionResult>),
    Notice(String),
}

impl Outcome {
    pub fn as_verdict(&self) -> Option<&InteractionResult> {
        match self {
            Outcome::Verdict(result) => Some(result),
            Outcome::Notice(_) => None,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, Outcome::Notice(_))
    }
}

pub struct Resolver {
    kb: KnowledgeBase,
    synonyms: SynonymTable,
    client: Option<Arc<dyn ModelClient>>,
    model: String,
    retry: RetryPolicy,
}

impl Resolver {
    /// Local-only resolver: knowledge base hits resolve, everything else
    /// gets the backend-unavailable notice.
    pub fn new(kb: KnowledgeBase, synonyms: SynonymTable) -> Self {
        Self {
            kb,
            synonyms,
            client: None,
            model: String::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_client(mut self, client: Arc<dyn ModelClient>, model: &str) -> Self {
        self.client = Some(client);
        self.model = model.to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.client.is_some()
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Resolve one product query against the user's profile.
    pub async fn resolve(&self, query: &str, profile: &UserProfile) -> Outcome {
        let query = query.trim();
        if query.is_empty() {
            return Outcome::Notice(dialogue::empty_query_notice());
        }

        let normalized = normalize_product(query, &self.synonyms);
        if let Some(entry) = self.kb.get(&normalized.canonical) {
            info!(query, canonical = %normalized.canonical, "resolved from knowledge base");
            let mut result = entry.result.clone();
            self.adapt_for_context(&mut result, profile);
            return Outcome::Verdict(Box::new(result));
        }

        let Some(client) = self.client.as_deref() else {
            warn!(query, "no backend configured, cannot resolve unknown product");
            return Outcome::Notice(dialogue::backend_unavailable_notice());
        };

        let prompt = build_prompt(profile, &normalized.canonical);
        debug!(query, canonical = %normalized.canonical, model = %self.model, "querying backend");

        let response = match retry_with_backoff(&self.retry, ModelError::is_transient, || {
            client.submit(&prompt, &self.model)
        })
        .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(query, error = %err, "backend request failed");
                return Outcome::Notice(dialogue::backend_failure_notice(&err.to_string()));
            }
        };

        let value = match crate::jsonx::parse_model_json(&response) {
            Ok(value) => value,
            Err(err) => {
                warn!(query, error = %err, "backend response is not JSON");
                return Outcome::Notice(dialogue::incomplete_response_notice());
            }
        };

        let has_level = value
            .get("level")
            .and_then(|v| v.as_str())
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        if !has_level {
            warn!(query, "backend response has no severity level");
            return Outcome::Notice(dialogue::incomplete_response_notice());
        }
        let result: InteractionResult = match serde_json::from_value(value) {
            Ok(result) => result,
            Err(err) => {
                warn!(query, error = %err, "backend response does not match the verdict shape");
                return Outcome::Notice(dialogue::incomplete_response_notice());
            }
        };

        let mut result = self.kb.apply_safety_net(result, query);
        self.adapt_for_context(&mut result, profile);
        Outcome::Verdict(Box::new(result))
    }

    /// Profile- and hygiene-adjustments applied to every verdict: drop
    /// non-http sources, fill missing timing advice from the severity
    /// default, add the continuous-delivery caveat where spacing intakes
    /// is meaningless.
    fn adapt_for_context(&self, result: &mut InteractionResult, profile: &UserProfile) {
        result.sources.retain(|source| is_http_url(&source.url));
        if result.recommendation.timing.trim().is_empty() {
            result.recommendation.timing = result.level.default_timing().to_string();
        }
        if profile.is_continuous_delivery() && !result.level.is_lowest() {
            result.contraception_impact.push_str(CONTINUOUS_CAVEAT);
        }
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}
