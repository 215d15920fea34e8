//! Configuration loading and validation for fewshot.
//!
//! Loads configuration from `~/.fewshot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use fewshot_core::request::RetrievalParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.fewshot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where exemplars are loaded from
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Retrieval defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Prompt shape and budget
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// JSONL exemplar file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Skip malformed lines instead of failing the load
    #[serde(default)]
    pub lenient: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f32,
}

fn default_k() -> usize {
    4
}
fn default_dedup_threshold() -> f32 {
    0.95
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            dedup_threshold: default_dedup_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Maximum combined content length of the prompt
    #[serde(default = "default_budget")]
    pub budget: usize,

    /// "chars" or "tokens"
    #[serde(default = "default_length_unit")]
    pub length_unit: String,

    /// Role of the persona message: "system" or "assistant"
    #[serde(default = "default_persona_role")]
    pub persona_role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

fn default_budget() -> usize {
    12_000
}
fn default_length_unit() -> String {
    "chars".into()
}
fn default_persona_role() -> String {
    "system".into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            length_unit: default_length_unit(),
            persona_role: default_persona_role(),
            preamble: None,
            instruction: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name; only "hashing" is built in
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Upper bound on a single embedding call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hashing".into()
}
fn default_dimension() -> usize {
    256
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimension: default_dimension(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

const LENGTH_UNITS: &[&str] = &["chars", "tokens"];
const PERSONA_ROLES: &[&str] = &["system", "assistant"];
const EMBEDDING_PROVIDERS: &[&str] = &["hashing"];

impl AppConfig {
    /// Load configuration from the default path (~/.fewshot/config.toml).
    ///
    /// Environment variables override the file:
    /// - `FEWSHOT_CORPUS`
    /// - `FEWSHOT_K`
    /// - `FEWSHOT_BUDGET`
    /// - `FEWSHOT_DEDUP_THRESHOLD`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup("FEWSHOT_CORPUS") {
            self.corpus.path = Some(PathBuf::from(path));
        }
        if let Some(k) = lookup("FEWSHOT_K") {
            self.retrieval.k = parse_env("FEWSHOT_K", &k)?;
        }
        if let Some(budget) = lookup("FEWSHOT_BUDGET") {
            self.prompt.budget = parse_env("FEWSHOT_BUDGET", &budget)?;
        }
        if let Some(threshold) = lookup("FEWSHOT_DEDUP_THRESHOLD") {
            self.retrieval.dedup_threshold = parse_env("FEWSHOT_DEDUP_THRESHOLD", &threshold)?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".fewshot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        RetrievalParams::new(self.retrieval.k, self.retrieval.dedup_threshold)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.prompt.budget == 0 {
            return Err(ConfigError::ValidationError("prompt.budget must be > 0".into()));
        }
        check_one_of("prompt.length_unit", &self.prompt.length_unit, LENGTH_UNITS)?;
        check_one_of("prompt.persona_role", &self.prompt.persona_role, PERSONA_ROLES)?;
        check_one_of("embedding.provider", &self.embedding.provider, EMBEDDING_PROVIDERS)?;

        if self.embedding.dimension == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.dimension must be > 0".into(),
            ));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "embedding.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key} has an invalid value: '{value}'")))
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{field} must be one of {}, got '{value}'",
            allowed.join(", ")
        )))
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
