//! Core agent session loop.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::llm::{ChatMessage, LlmClient, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::prompt::build_system_prompt;

/// One tool-calling conversation between the model and the tool registry.
///
/// The session owns no long-lived state: construct it per request, call
/// [`AgentSession::run`] once, and drop it.
pub struct AgentSession {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    model: String,
    max_iterations: usize,
}

impl AgentSession {
    /// Create a session over the given model client and tool registry.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        model: String,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            model,
            max_iterations,
        }
    }

    /// Run the session to completion and return the model's final text.
    pub async fn run(&self, prompt: &str, workspace: &Path) -> anyhow::Result<String> {
        let session_id = Uuid::new_v4();

        // Build initial messages
        let mut messages = vec![
            ChatMessage {
                role: Role::System,
                content: Some(build_system_prompt()),
                tool_calls: None,
                tool_call_id: None,
            },
            ChatMessage {
                role: Role::User,
                content: Some(prompt.to_string()),
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        // Get tool schemas for the model
        let tool_schemas = self.tools.get_tool_schemas();

        // Agent loop
        for iteration in 0..self.max_iterations {
            tracing::debug!(
                session_id = %session_id,
                iteration = iteration + 1,
                "Agent iteration"
            );

            let response = self
                .llm
                .chat_completion(&self.model, &messages, Some(&tool_schemas))
                .await?;

            // Check for tool calls
            if let Some(tool_calls) = &response.tool_calls {
                if !tool_calls.is_empty() {
                    // Add assistant message with tool calls
                    messages.push(ChatMessage {
                        role: Role::Assistant,
                        content: response.content.clone(),
                        tool_calls: Some(tool_calls.clone()),
                        tool_call_id: None,
                    });

                    // Execute each tool call
                    for tool_call in tool_calls {
                        tracing::info!(
                            session_id = %session_id,
                            tool = %tool_call.function.name,
                            args = %truncate_for_log(&tool_call.function.arguments, 200),
                            "Executing tool call"
                        );

                        let result = self.execute_tool_call(tool_call, workspace).await;

                        let result_str = match &result {
                            Ok(output) => output.clone(),
                            Err(e) => format!("Error: {}", e),
                        };

                        tracing::debug!(
                            session_id = %session_id,
                            tool = %tool_call.function.name,
                            result = %truncate_for_log(&result_str, 1000),
                            "Tool call finished"
                        );

                        // Add tool result message
                        messages.push(ChatMessage {
                            role: Role::Tool,
                            content: Some(result_str),
                            tool_calls: None,
                            tool_call_id: Some(tool_call.id.clone()),
                        });
                    }

                    continue;
                }
            }

            // No tool calls - this is the final response
            if let Some(content) = response.content {
                tracing::info!(
                    session_id = %session_id,
                    response = %truncate_for_log(&content, 2000),
                    "Agent session complete"
                );
                return Ok(content);
            }

            // Empty response - shouldn't happen but handle gracefully
            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.max_iterations
        ))
    }

    /// Execute a single tool call.
    async fn execute_tool_call(
        &self,
        tool_call: &ToolCall,
        workspace: &Path,
    ) -> anyhow::Result<String> {
        let args: serde_json::Value =
            serde_json::from_str(&tool_call.function.arguments).unwrap_or(serde_json::Value::Null);

        self.tools
            .execute(&tool_call.function.name, args, workspace)
            .await
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &s[..end])
    }
}
