//! HTTP API surface.
//!
//! Routes:
//! - `POST /api/login` — password gate with per-client failure throttling
//! - `POST /api/agent` — one-shot chat or a full project-building session
//! - `GET /api/health` — liveness probe

mod agent;
mod login;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::budget::UsageBudget;
use crate::config::Config;
use crate::git::GitCli;
use crate::github::GitHubClient;
use crate::llm::{LlmClient, OpenRouterClient};
use crate::project::ProjectPipeline;
use crate::throttle::LoginThrottle;

use types::HealthResponse;

/// Shared state handed to every handler.
///
/// Built once at startup and injected through axum's `State` extractor;
/// nothing here is process-global.
pub struct AppState {
    pub config: Config,
    pub budget: Arc<UsageBudget>,
    pub throttle: LoginThrottle,
    pub llm: Arc<dyn LlmClient>,
    pub pipeline: Arc<ProjectPipeline>,
}

/// Build the API router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login::login))
        .route("/api/agent", post(agent::agent))
        .route("/api/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Wire up shared state from configuration and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let budget = Arc::new(UsageBudget::new(config.max_usage_words));
    let pipeline = Arc::new(ProjectPipeline::new(
        llm.clone(),
        Arc::new(GitHubClient::new(config.github_token.clone())),
        Arc::new(GitCli::new()),
        budget.clone(),
        config.workspace_path.clone(),
        config.default_model.clone(),
    ));

    let state = Arc::new(AppState {
        throttle: LoginThrottle::new(),
        budget,
        llm,
        pipeline,
        config,
    });

    let app = routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    // Connect info is required so the login throttle can fall back to the
    // peer address when no X-Forwarded-For header is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
