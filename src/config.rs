//! Run configuration: defaults, an optional JSON file, and overrides.
//!
//! Resolution order for a setting is explicit flag > config file >
//! environment > built-in default. Defaults: three chapters, deepseek-chat,
//! a high sampling temperature, no retries, and tolerance for empty
//! replies.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the chat endpoint base URL.
pub const API_BASE_ENV: &str = "YARNSMITH_API_BASE";

/// Tunable settings for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of story chapters to generate.
    pub chapter_count: usize,
    /// Model identifier sent to the chat endpoint.
    pub model: String,
    /// Base URL of the DeepSeek-compatible API.
    pub api_base: String,
    /// Sampling temperature for every stage.
    pub temperature: f64,
    /// Completion budget per call.
    pub max_tokens: u32,
    /// Treat an empty model reply as a hard error.
    pub require_content: bool,
    /// Transport retries after the first failed attempt.
    pub max_retries: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chapter_count: 3,
            model: "deepseek-chat".to_string(),
            api_base: "https://api.deepseek.com".to_string(),
            temperature: 1.5,
            max_tokens: 8000,
            require_content: false,
            max_retries: 0,
        }
    }
}

impl RunConfig {
    /// Load a config file, or the defaults when no path was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment overrides. The endpoint base is the only ambient
    /// setting; the credential is read by the transport itself.
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base = base;
            }
        }
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<()> {
        if self.chapter_count == 0 {
            return Err(anyhow!("chapter_count must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be at least 1"));
        }
        Ok(())
    }
}
