#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

/// The fixed analysis prompt sent alongside the selected photo.
pub const DEFAULT_ANALYSIS_PROMPT: &str =
    "iti dau 3 poze cu pielea mea analizeaza si zici cei cu ea roseata,cosurie  etc.. \n\n";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Bearer credential for the vision API. Usually supplied via OPENAI_API_KEY.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens for the analysis response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout for the upstream call in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// System instruction for the vision model. Empty string by default.
    #[serde(default)]
    pub system_prompt: String,

    #[serde(default = "default_analysis_prompt")]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_body_limit_bytes() -> usize {
    52_428_800 // 50 MB
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_max_tokens() -> u32 {
    800
}
fn default_timeout_seconds() -> u64 {
    60
}
fn default_analysis_prompt() -> String {
    DEFAULT_ANALYSIS_PROMPT.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            prompt: default_analysis_prompt(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply
    /// environment overrides (OPENAI_API_KEY, PORT).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file: {}", p.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Invalid config file: {}", p.display()))?
            }
            None => Config::default(),
        };

        config.apply_overrides(env::var("OPENAI_API_KEY").ok(), env::var("PORT").ok());

        Ok(config)
    }

    fn apply_overrides(&mut self, api_key: Option<String>, port: Option<String>) {
        if let Some(key) = api_key {
            if !key.trim().is_empty() {
                self.upstream.api_key = key;
            }
        }
        if let Some(port) = port {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!("Ignoring unparseable PORT value: {}", port),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.trim().is_empty() {
            anyhow::bail!(
                "No upstream API key configured. Set OPENAI_API_KEY or [upstream] api_key."
            );
        }
        if self.upstream.base_url.trim().is_empty() {
            anyhow::bail!("Upstream base URL cannot be empty");
        }
        Ok(())
    }
}
