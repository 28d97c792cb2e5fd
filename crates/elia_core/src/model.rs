//! Remote model backend: trait, HTTP client, and a scriptable fake.
//!
//! The HTTP client speaks the OpenAI-compatible chat completions API and
//! asks for a JSON object response. Everything downstream goes through the
//! `ModelClient` trait so the conversation flow tests against the fake.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Backend failure modes. `is_transient` decides what the retry loop may
/// attempt again.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("backend HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("backend returned an empty response")]
    EmptyResponse,
}

impl ModelError {
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Http { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            ModelError::Network(_) | ModelError::Timeout(_) => true,
            ModelError::EmptyResponse => false,
        }
    }
}

/// A system/user prompt pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Submit a prompt and return the raw text of the first choice.
    async fn submit(&self, prompt: &Prompt, model: &str) -> Result<String, ModelError>;
}

/// OpenAI-compatible HTTP backend.
pub struct HttpModelClient {
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpModelClient {
    pub fn new(endpoint: &str, api_key: &str, timeout_secs: u64) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ModelError::Network(format!("client build failed: {e}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn submit(&self, prompt: &Prompt, model: &str) -> Result<String, ModelError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user},
            ],
            "temperature": 0.2,
            "response_format": {"type": "json_object"},
        });

        debug!(url = %url, model, "submitting prompt");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ModelError::Network(format!("connection failed: {e}"))
                } else {
                    ModelError::Network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(ModelError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ModelError::Network(format!("invalid response body: {e}")))?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();
        if content.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(content)
    }
}

/// Scriptable backend for tests: pops queued responses in order, and keeps
/// repeating the last one once the queue is down to a single entry.
pub struct FakeModelClient {
    responses: Mutex<Vec<Result<String, ModelError>>>,
    call_count: Mutex<usize>,
}

impl FakeModelClient {
    pub fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    pub fn always_text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn always_error(error: ModelError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ModelClient for FakeModelClient {
    async fn submit(&self, _prompt: &Prompt, _model: &str) -> Result<String, ModelError> {
        *self.call_count.lock().unwrap() += 1;
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        if responses.len() == 1 {
            return responses[0].clone();
        }
        responses.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ModelError::Http {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(ModelError::Http {
            status: 429,
            message: String::new()
        }
        .is_transient());
        assert!(ModelError::Network("down".to_string()).is_transient());
        assert!(ModelError::Timeout(30).is_transient());
        assert!(!ModelError::Http {
            status: 401,
            message: String::new()
        }
        .is_transient());
        assert!(!ModelError::EmptyResponse.is_transient());
    }

    #[tokio::test]
    async fn test_fake_pops_responses_in_order() {
        let fake = FakeModelClient::new(vec![
            Ok("premier".to_string()),
            Ok("deuxième".to_string()),
        ]);
        let prompt = Prompt {
            system: String::new(),
            user: String::new(),
        };
        assert_eq!(fake.submit(&prompt, "m").await.unwrap(), "premier");
        assert_eq!(fake.submit(&prompt, "m").await.unwrap(), "deuxième");
        assert_eq!(fake.submit(&prompt, "m").await.unwrap(), "deuxième");
        assert_eq!(fake.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fake_with_empty_queue_errors() {
        let fake = FakeModelClient::new(vec![]);
        let prompt = Prompt {
            system: String::new(),
            user: String::new(),
        };
        assert!(matches!(
            fake.submit(&prompt, "m").await,
            Err(ModelError::EmptyResponse)
        ));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let client = HttpModelClient::new("https://api.example.com/", "k", 30).unwrap();
        assert_eq!(client.endpoint, "https://api.example.com");
    }
}
