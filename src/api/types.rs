//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to authenticate against the dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// The dashboard password
    pub password: String,
}

/// Response to a login attempt.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Whether authentication succeeded
    pub success: bool,

    /// Human-readable failure reason, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How a `/api/agent` request should be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Full tool-calling session that can build and publish a project
    Agent,
    /// One-shot completion with no tools and no budget gate
    Chat,
}

impl Default for AgentMode {
    fn default() -> Self {
        AgentMode::Agent
    }
}

/// Request to run the agent or a one-shot chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentRequest {
    /// The user's prompt; requests without one are rejected
    pub prompt: Option<String>,

    /// Processing mode (defaults to the full agent)
    #[serde(default)]
    pub mode: AgentMode,
}

/// Successful response from `/api/agent`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    /// The model's final text
    pub response: String,
}

/// Error envelope for failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// What went wrong
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
