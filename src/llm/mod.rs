//! Language-model client abstraction.
//!
//! The rest of the crate talks to the model through [`LlmClient`], which
//! hides the provider behind a chat-completions surface: a message history
//! in, an assistant reply (text and/or tool calls) out. The production
//! implementation is [`OpenRouterClient`].

mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("LLM response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("LLM returned an empty response")]
    Empty,
}

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in the conversation history sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A tool call proposed by the model (OpenAI function-calling format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, exactly as the model produced them.
    pub arguments: String,
}

/// The assistant's reply to one completion request.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Narrow interface to the completion provider.
///
/// The model stays an opaque decision-maker: callers pass messages and tool
/// schemas, receive text and/or proposed tool invocations, and never reach
/// into provider internals.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[serde_json::Value]>,
    ) -> Result<ChatResponse, LlmError>;

    /// One-shot completion: a single user prompt, no tools, text back.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let messages = [ChatMessage {
            role: Role::User,
            content: Some(prompt.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }];
        let response = self.chat_completion(model, &messages, None).await?;
        response.content.ok_or(LlmError::Empty)
    }
}
