//! Runtime configuration.
//!
//! v0.9.0: every section is optional and every field has a default, so an
//! absent or partial config file always yields a working setup. The API
//! key can live in the environment instead of on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EliaError;
use crate::kb::KnowledgeBase;
use crate::retry::RetryPolicy;
use crate::synonyms::SynonymTable;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "ELIA_API_KEY";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_jitter_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Overridden by `ELIA_API_KEY` when that is set and non-empty.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay_ms: self.base_delay_ms,
            max_jitter_ms: self.max_jitter_ms,
        }
    }
}

/// Optional overrides for the builtin data tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub synonyms: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EliaConfig {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub log: LogSettings,
}

impl EliaConfig {
    /// Load from a TOML file. A missing file is the default configuration;
    /// a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, EliaError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: EliaConfig = toml::from_str(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Effective API key: environment first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Ok(env_key) = std::env::var(API_KEY_ENV) {
            if !env_key.trim().is_empty() {
                return Some(env_key);
            }
        }
        self.model
            .api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .cloned()
    }

    /// Knowledge base: the configured file, or the builtin set.
    pub fn load_knowledge_base(&self) -> Result<KnowledgeBase, EliaError> {
        match &self.data.knowledge_base {
            Some(path) => KnowledgeBase::load(path),
            None => Ok(KnowledgeBase::builtin()),
        }
    }

    /// Synonym table: the configured file, or the builtin set.
    pub fn load_synonyms(&self) -> Result<SynonymTable, EliaError> {
        match &self.data.synonyms {
            Some(path) => SynonymTable::load(path),
            None => Ok(SynonymTable::builtin()),
        }
    }
}
