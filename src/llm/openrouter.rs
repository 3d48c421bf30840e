//! OpenRouter chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolCall};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Per-request timeout; a hung provider call fails like any other error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [serde_json::Value]>,
}

#[derive(Deserialize)]
struct RawCompletionResponse {
    #[serde(default)]
    choices: Vec<RawChoice>,
    error: Option<RawApiError>,
}

#[derive(Deserialize)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Deserialize)]
struct RawMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
struct RawApiError {
    message: String,
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[serde_json::Value]>,
    ) -> Result<ChatResponse, LlmError> {
        tracing::debug!(
            model,
            message_count = messages.len(),
            tool_count = tools.map(|t| t.len()).unwrap_or(0),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .json(&CompletionRequest {
                model,
                messages,
                tools,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, bytes = body.len(), "Chat completion response received");

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: RawCompletionResponse = serde_json::from_str(&body)?;
        if let Some(err) = parsed.error {
            return Err(LlmError::Provider(err.message));
        }

        let choice = parsed.choices.into_iter().next().ok_or(LlmError::Empty)?;
        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_request_serialization_omits_missing_tools() {
        let messages = [ChatMessage {
            role: Role::User,
            content: Some("hi".to_string()),
            tool_calls: None,
            tool_call_id: None,
        }];
        let request = CompletionRequest {
            model: "openai/gpt-4o-mini",
            messages: &messages,
            tools: None,
        };
        let json = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(json["model"], "openai/gpt-4o-mini");
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_decodes_text_reply() {
        let body = r#"{"choices":[{"message":{"content":"hello there"}}]}"#;
        let parsed: RawCompletionResponse = serde_json::from_str(body).expect("decode body");
        let choice = parsed.choices.into_iter().next().expect("one choice");
        assert_eq!(choice.message.content.as_deref(), Some("hello there"));
        assert!(choice.message.tool_calls.is_none());
    }

    #[test]
    fn test_decodes_tool_call_reply() {
        let body = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "manage_project", "arguments": "{\"project_name\":\"demo\"}"}
                    }]
                }
            }]
        }"#;
        let parsed: RawCompletionResponse = serde_json::from_str(body).expect("decode body");
        let choice = parsed.choices.into_iter().next().expect("one choice");
        let calls = choice.message.tool_calls.expect("tool calls present");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "manage_project");
    }

    #[test]
    fn test_decodes_provider_error_body() {
        let body = r#"{"error":{"message":"quota exceeded"}}"#;
        let parsed: RawCompletionResponse = serde_json::from_str(body).expect("decode body");
        assert_eq!(parsed.error.expect("error present").message, "quota exceeded");
        assert!(parsed.choices.is_empty());
    }
}
