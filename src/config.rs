//! Configuration management for shipwright.
//!
//! Configuration can be set via environment variables:
//! - `DASHBOARD_PASSWORD` - Required. Password expected by the dashboard login.
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `GITHUB_TOKEN` - Optional. Token used to create remote repositories.
//!   Without it the server still runs; project provisioning fails on use.
//! - `DEFAULT_MODEL` - Optional. The default LLM model to use. Defaults to `openai/gpt-4o-mini`.
//! - `WORKSPACE_PATH` - Optional. Root directory for cloned projects. Defaults to `/tmp/projects`.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `7000`.
//! - `MAX_USAGE_WORDS` - Optional. Ceiling for the usage budget. Defaults to `50000`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Password required by the dashboard login endpoint
    pub dashboard_password: String,

    /// OpenRouter API key
    pub api_key: String,

    /// Token for the repository host; checked lazily at provision time
    pub github_token: Option<String>,

    /// Default LLM model identifier (OpenRouter format)
    pub default_model: String,

    /// Root directory under which project working copies are cloned
    pub workspace_path: PathBuf,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Ceiling for the process-wide usage budget, in words of model output
    pub max_usage_words: u64,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `DASHBOARD_PASSWORD` or
    /// `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dashboard_password = std::env::var("DASHBOARD_PASSWORD")
            .map_err(|_| ConfigError::MissingEnvVar("DASHBOARD_PASSWORD".to_string()))?;

        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let github_token = std::env::var("GITHUB_TOKEN").ok();

        let default_model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let workspace_path = std::env::var("WORKSPACE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp/projects"));

        let host = std::env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "7000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_usage_words = std::env::var("MAX_USAGE_WORDS")
            .unwrap_or_else(|_| "50000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_USAGE_WORDS".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e)))?;

        Ok(Self {
            dashboard_password,
            api_key,
            github_token,
            default_model,
            workspace_path,
            host,
            port,
            max_usage_words,
            max_iterations,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(
        dashboard_password: String,
        api_key: String,
        workspace_path: PathBuf,
    ) -> Self {
        Self {
            dashboard_password,
            api_key,
            github_token: None,
            default_model: "openai/gpt-4o-mini".to_string(),
            workspace_path,
            host: "127.0.0.1".to_string(),
            port: 7000,
            max_usage_words: 50_000,
            max_iterations: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_defaults() {
        let config = Config::new(
            "hunter2".to_string(),
            "or-key".to_string(),
            PathBuf::from("/tmp/ws"),
        );
        assert_eq!(config.dashboard_password, "hunter2");
        assert_eq!(config.max_usage_words, 50_000);
        assert_eq!(config.max_iterations, 10);
        assert!(config.github_token.is_none());
    }
}
