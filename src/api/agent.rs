//! Agent endpoint.
//!
//! `POST /api/agent` serves two modes. `chat` is a plain one-shot
//! completion with no tools and no budget accounting. `agent` runs a
//! tool-calling session that can provision, generate, and publish a
//! project; it is refused up front with a canned apology once the usage
//! budget is exhausted.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::agent::AgentSession;
use crate::tools::{ManageProject, ToolRegistry};

use super::types::{AgentMode, AgentRequest, AgentResponse, ErrorBody};
use super::AppState;

/// Canned refusal for agent sessions once the budget is spent. Returned
/// with HTTP 200 so the UI renders it as an ordinary reply.
const USAGE_LIMIT_APOLOGY: &str = "I'm sorry, I have reached my API usage limit. \
     I cannot create a new project at this time. Please try again later.";

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn agent_response(text: String) -> Response {
    (StatusCode::OK, Json(AgentResponse { response: text })).into_response()
}

pub(crate) async fn agent(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AgentRequest>,
) -> Response {
    let prompt = match request.prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return error_response(StatusCode::BAD_REQUEST, "Prompt is required.".to_string());
        }
    };

    let request_id = Uuid::new_v4();

    match request.mode {
        AgentMode::Chat => {
            tracing::info!(request_id = %request_id, "Chat completion request");
            match state
                .llm
                .complete(&state.config.default_model, &prompt)
                .await
            {
                Ok(text) => agent_response(text),
                Err(e) => {
                    tracing::error!(request_id = %request_id, error = %e, "Chat completion failed");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            }
        }
        AgentMode::Agent => {
            if state.budget.is_exhausted() {
                tracing::warn!(
                    request_id = %request_id,
                    used = state.budget.used(),
                    limit = state.budget.limit(),
                    "Usage limit reached, refusing agent session"
                );
                return agent_response(USAGE_LIMIT_APOLOGY.to_string());
            }

            tracing::info!(request_id = %request_id, "Starting agent session");

            let mut tools = ToolRegistry::new();
            tools.register(Box::new(ManageProject::new(state.pipeline.clone())));

            let session = AgentSession::new(
                state.llm.clone(),
                tools,
                state.config.default_model.clone(),
                state.config.max_iterations,
            );

            match session.run(&prompt, &state.config.workspace_path).await {
                Ok(text) => agent_response(text),
                Err(e) => {
                    tracing::error!(request_id = %request_id, error = %e, "Agent session failed");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            }
        }
    }
}
