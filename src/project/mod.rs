//! Project materializer.
//!
//! Drives one project from goal to published repository in four steps:
//! provision (create the remote repository and clone it), stack selection
//! (one short completion), code generation (one large completion, parsed
//! into files and written to the working copy), and publish (stage, commit,
//! push). The two completions are gated by the usage budget and record
//! their word cost; the first failing step short-circuits the run.

pub mod parser;
pub mod prompt;

pub use parser::{parse_generated_files, GeneratedFile};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::budget::{word_count, UsageBudget};
use crate::git::VersionControl;
use crate::github::RepoHost;
use crate::llm::LlmClient;

/// Remote branch the pipeline publishes to.
const DEFAULT_BRANCH: &str = "main";

/// Warning returned when the budget is exhausted before the run starts.
const BUDGET_WARNING_START: &str = "Warning: API usage limit reached. Cannot start new projects.";

/// Warning returned when the budget runs out between stack selection and
/// generation.
const BUDGET_WARNING_GENERATION: &str =
    "Warning: API usage limit reached. Stopping project generation to prevent charges.";

/// One request to materialize a project; lives for a single run.
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    pub project_name: String,
    pub goal: String,
}

/// How a pipeline run ended short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    /// All four steps succeeded; carries the user-facing summary.
    Completed(String),
    /// A budget gate tripped; carries the warning text. Not an error: the
    /// caller relays the warning as a normal result.
    BudgetExhausted(String),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project name: {0}")]
    InvalidName(String),

    #[error("Failed to create and clone repository: {0}")]
    Provision(String),

    #[error("Failed to determine a technology stack: {0}")]
    StackSelection(String),

    #[error("Failed to generate project code: {0}")]
    Generation(String),

    #[error("Could not parse generated code from the model.")]
    UnparseableOutput,

    #[error("Generated file path escapes the project directory: {0}")]
    UnsafePath(String),

    #[error("Failed to write generated file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to commit and push changes: {0}")]
    Publish(String),
}

/// The four-step pipeline and its collaborators.
pub struct ProjectPipeline {
    llm: Arc<dyn LlmClient>,
    host: Arc<dyn RepoHost>,
    vcs: Arc<dyn VersionControl>,
    budget: Arc<UsageBudget>,
    workspace: PathBuf,
    model: String,
}

impl ProjectPipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        host: Arc<dyn RepoHost>,
        vcs: Arc<dyn VersionControl>,
        budget: Arc<UsageBudget>,
        workspace: PathBuf,
        model: String,
    ) -> Self {
        Self {
            llm,
            host,
            vcs,
            budget,
            workspace,
            model,
        }
    }

    /// Run the pipeline for one request. Deterministic given its
    /// collaborators: no retries, no internal decision-making.
    pub async fn run(&self, request: &ProjectRequest) -> Result<ProjectOutcome, ProjectError> {
        validate_project_name(&request.project_name)?;

        if self.budget.is_exhausted() {
            tracing::warn!(
                project = %request.project_name,
                "Usage budget exhausted; refusing to start project"
            );
            return Ok(ProjectOutcome::BudgetExhausted(BUDGET_WARNING_START.to_string()));
        }

        tracing::info!(
            project = %request.project_name,
            goal = %request.goal,
            "Starting project pipeline"
        );

        let workdir = self.provision(request).await?;

        let stack = self.select_stack(&request.goal).await?;
        tracing::info!(project = %request.project_name, stack = %stack, "Stack selected");

        if self.budget.is_exhausted() {
            tracing::warn!(
                project = %request.project_name,
                "Usage budget exhausted before code generation"
            );
            return Ok(ProjectOutcome::BudgetExhausted(
                BUDGET_WARNING_GENERATION.to_string(),
            ));
        }

        let file_count = self
            .generate_and_write(&request.goal, &stack, &workdir)
            .await?;
        tracing::info!(project = %request.project_name, file_count, "Generated files written");

        self.publish(&workdir, &stack).await?;
        tracing::info!(project = %request.project_name, "Project committed and pushed");

        Ok(ProjectOutcome::Completed(format!(
            "Full-stack project '{}' successfully created in {}, with code generated and \
             pushed to GitHub. The repository is ready for deployment.",
            request.project_name, stack
        )))
    }

    /// Step 1: create the remote repository and clone it into the workspace.
    async fn provision(&self, request: &ProjectRequest) -> Result<PathBuf, ProjectError> {
        let description = format!("An AI-generated project with the goal: {}", request.goal);
        let created = self
            .host
            .create_repository(&request.project_name, &description, true)
            .await
            .map_err(|e| ProjectError::Provision(e.to_string()))?;

        tokio::fs::create_dir_all(&self.workspace)
            .await
            .map_err(|e| ProjectError::Provision(format!("failed to prepare workspace: {e}")))?;

        let workdir = self.workspace.join(&request.project_name);
        self.vcs
            .clone_repo(&created.clone_url, &workdir)
            .await
            .map_err(|e| ProjectError::Provision(e.to_string()))?;

        Ok(workdir)
    }

    /// Step 2: one short completion naming the stack. Costs response words
    /// plus prompt words.
    async fn select_stack(&self, goal: &str) -> Result<String, ProjectError> {
        let prompt = prompt::stack_selection_prompt(goal);
        let response = self
            .llm
            .complete(&self.model, &prompt)
            .await
            .map_err(|e| ProjectError::StackSelection(e.to_string()))?;
        self.budget.record(word_count(&response) + word_count(&prompt));
        Ok(response.trim().to_string())
    }

    /// Step 3: one large completion, parsed into files and written to the
    /// working copy. Costs response words. Zero parsed files is terminal.
    async fn generate_and_write(
        &self,
        goal: &str,
        stack: &str,
        workdir: &Path,
    ) -> Result<usize, ProjectError> {
        let prompt = prompt::code_generation_prompt(goal, stack);
        let generated = self
            .llm
            .complete(&self.model, &prompt)
            .await
            .map_err(|e| ProjectError::Generation(e.to_string()))?;
        self.budget.record(word_count(&generated));

        let files = parse_generated_files(&generated);
        if files.is_empty() {
            return Err(ProjectError::UnparseableOutput);
        }

        for file in &files {
            self.write_file(workdir, file).await?;
        }
        Ok(files.len())
    }

    async fn write_file(&self, workdir: &Path, file: &GeneratedFile) -> Result<(), ProjectError> {
        // The parser already discards unsafe paths; re-check here because
        // this is the boundary that actually touches the filesystem.
        if !parser::is_safe_relative_path(&file.relative_path) {
            return Err(ProjectError::UnsafePath(file.relative_path.clone()));
        }

        let path = workdir.join(&file.relative_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ProjectError::WriteFile {
                    path: file.relative_path.clone(),
                    source: e,
                })?;
        }
        tokio::fs::write(&path, &file.content)
            .await
            .map_err(|e| ProjectError::WriteFile {
                path: file.relative_path.clone(),
                source: e,
            })
    }

    /// Step 4: stage everything, commit naming the stack, push.
    async fn publish(&self, workdir: &Path, stack: &str) -> Result<(), ProjectError> {
        let message = format!("Initial commit: AI-generated project in {}", stack);

        self.vcs
            .stage_all(workdir)
            .await
            .map_err(|e| ProjectError::Publish(e.to_string()))?;
        self.vcs
            .commit(workdir, &message)
            .await
            .map_err(|e| ProjectError::Publish(e.to_string()))?;
        self.vcs
            .push(workdir, DEFAULT_BRANCH)
            .await
            .map_err(|e| ProjectError::Publish(e.to_string()))
    }
}

/// Project names become directory names and repository names; keep them to
/// a conservative charset so a hostile tool argument cannot leave the
/// workspace root.
fn validate_project_name(name: &str) -> Result<(), ProjectError> {
    if name.is_empty() || name.len() > 100 || name == "." || name == ".." {
        return Err(ProjectError::InvalidName(name.to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ProjectError::InvalidName(name.to_string()));
    }
    Ok(())
}
