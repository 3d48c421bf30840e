//! The single tool exposed to agent sessions.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::project::{ProjectOutcome, ProjectPipeline, ProjectRequest};

use super::Tool;

/// Runs the whole provision/generate/publish pipeline for one project.
pub struct ManageProject {
    pipeline: Arc<ProjectPipeline>,
}

impl ManageProject {
    pub fn new(pipeline: Arc<ProjectPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Tool for ManageProject {
    fn name(&self) -> &str {
        "manage_full_stack_project"
    }

    fn description(&self) -> &str {
        "Manage a full-stack project from start to finish: create a GitHub repository \
         and clone it, determine the best programming language and stack for the goal, \
         generate and write the project code, and commit and push it."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_name": {
                    "type": "string",
                    "description": "The name for the new project and its repository"
                },
                "goal": {
                    "type": "string",
                    "description": "The high-level goal for the project"
                }
            },
            "required": ["project_name", "goal"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> anyhow::Result<String> {
        let project_name = args["project_name"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'project_name' argument"))?;
        let goal = args["goal"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'goal' argument"))?;

        let request = ProjectRequest {
            project_name: project_name.to_string(),
            goal: goal.to_string(),
        };

        // Budget warnings are results, not errors: the model should see them
        // without an "Error:" marker and stop gracefully.
        match self.pipeline.run(&request).await? {
            ProjectOutcome::Completed(summary) => Ok(summary),
            ProjectOutcome::BudgetExhausted(warning) => Ok(warning),
        }
    }
}
