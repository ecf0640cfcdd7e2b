//! Configuration for generation, invocation, and the model client.
//!
//! Every section has defaults, so a config file only needs the keys it
//! overrides. Files are JSON:
//!
//! ```json
//! {
//!   "generation": { "temperature": 0.7 },
//!   "invoker": { "max_attempts": 5, "backoff": "exponential" },
//!   "client": { "model": "mistral" }
//! }
//! ```

use crate::error::{Error, Result};
use crate::invoke::rate_limit::interval_from_secs;
use crate::invoke::{Backoff, BackoffKind, RateLimiter, RetryPolicy};
use crate::io::read_file;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default operation key for topic generation.
pub const DEFAULT_OPERATION_ID: &str = "topicgen";

/// Default Ollama-compatible generate endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Plain-text replies, the form the heading parser expects.
pub const MIME_TEXT: &str = "text/plain";

/// JSON-constrained replies.
pub const MIME_JSON: &str = "application/json";

/// Sampling parameters passed through to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Requested response MIME type (`text/plain` or `application/json`).
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8000,
            response_mime_type: MIME_TEXT.to_string(),
        }
    }
}

impl GenerationConfig {
    /// Returns true if the reply must be constrained to JSON.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        self.response_mime_type == MIME_JSON
    }
}

/// Rate-gate and retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Key under which invocations are rate limited.
    pub operation_id: String,
    /// Attempt ceiling, first try included.
    pub max_attempts: u32,
    /// Minimum seconds between invocations.
    pub min_interval_secs: f64,
    /// Backoff family.
    pub backoff: BackoffKind,
    /// Base backoff delay in milliseconds.
    pub backoff_ms: u64,
    /// Exponential backoff ceiling in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            operation_id: DEFAULT_OPERATION_ID.to_string(),
            max_attempts: crate::invoke::DEFAULT_MAX_ATTEMPTS,
            min_interval_secs: 1.0,
            backoff: BackoffKind::Fixed,
            backoff_ms: 1000,
            max_backoff_ms: 30_000,
        }
    }
}

impl InvokerConfig {
    /// Returns the configured backoff schedule.
    #[must_use]
    pub const fn backoff_schedule(&self) -> Backoff {
        self.backoff.build(
            Duration::from_millis(self.backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }

    /// Builds the retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(self.max_attempts, self.backoff_schedule())?)
    }

    /// Builds the rate limiter for `operation_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is negative or non-finite.
    pub fn rate_limiter(&self) -> Result<RateLimiter> {
        Ok(RateLimiter::new(
            self.operation_id.as_str(),
            interval_from_secs(self.min_interval_secs)?,
        ))
    }
}

/// Model endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Generate endpoint URL.
    pub endpoint: String,
    /// Model name.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sampling parameters.
    pub generation: GenerationConfig,
    /// Rate-gate and retry settings.
    pub invoker: InvokerConfig,
    /// Model endpoint settings.
    pub client: ClientConfig,
}

impl Config {
    /// Loads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = read_file(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(config_error(format!(
                "temperature must be within 0.0..=2.0, got {}",
                generation.temperature
            )));
        }
        if !(generation.top_p > 0.0 && generation.top_p <= 1.0) {
            return Err(config_error(format!(
                "top_p must be within (0.0, 1.0], got {}",
                generation.top_p
            )));
        }
        if ![MIME_TEXT, MIME_JSON].contains(&generation.response_mime_type.as_str()) {
            return Err(config_error(format!(
                "response_mime_type must be {MIME_TEXT} or {MIME_JSON}, got {}",
                generation.response_mime_type
            )));
        }
        if generation.max_output_tokens == 0 {
            return Err(config_error("max_output_tokens must be > 0".to_string()));
        }
        if self.invoker.operation_id.trim().is_empty() {
            return Err(config_error("operation_id must not be empty".to_string()));
        }
        if self.client.timeout_secs == 0 {
            return Err(config_error("timeout_secs must be > 0".to_string()));
        }
        self.invoker.retry_policy()?;
        self.invoker.rate_limiter()?;
        Ok(())
    }
}

fn config_error(message: String) -> Error {
    Error::Config { message }
}
