//! Tool definitions for the agent.
//!
//! A tool is a capability the model can invoke by name with JSON arguments.
//! The registry converts registered tools into OpenAI function-calling
//! schemas and dispatches execution. This server registers exactly one
//! tool, [`ManageProject`].

mod project;

pub use project::ManageProject;

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

/// A capability the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String>;
}

/// The set of tools exposed to a session.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Tool definitions in the OpenAI function-calling format.
    pub fn get_tool_schemas(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        workspace: &Path,
    ) -> anyhow::Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(args, workspace).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
