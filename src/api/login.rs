//! Dashboard login endpoint.
//!
//! `POST /api/login` checks the supplied password against the configured
//! one and throttles repeated failures per client identity. A client in
//! cooldown is refused before the password is even looked at.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::throttle::AuthResult;

use super::types::{LoginRequest, LoginResponse};
use super::AppState;

/// Resolve the identity used for throttling.
///
/// Prefers the first entry of `X-Forwarded-For` so that clients behind the
/// reverse proxy are told apart; falls back to the peer address.
pub(crate) fn client_identity(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Response {
    let identity = client_identity(&headers, addr);

    let outcome = state
        .throttle
        .check_and_record(
            &identity,
            &request.password,
            &state.config.dashboard_password,
            Instant::now(),
        )
        .await;

    match outcome {
        AuthResult::Allowed => {
            tracing::info!(identity = %identity, "Login succeeded");
            (
                StatusCode::OK,
                Json(LoginResponse {
                    success: true,
                    message: None,
                }),
            )
                .into_response()
        }
        AuthResult::BadCredential => {
            tracing::info!(identity = %identity, "Login failed: incorrect password");
            (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse {
                    success: false,
                    message: Some("Incorrect password".to_string()),
                }),
            )
                .into_response()
        }
        AuthResult::TooManyAttempts => {
            tracing::warn!(identity = %identity, "Login refused: identity in cooldown");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(LoginResponse {
                    success: false,
                    message: Some("Too many failed attempts. Try again later.".to_string()),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::UsageBudget;
    use crate::config::Config;
    use crate::git::GitCli;
    use crate::github::GitHubClient;
    use crate::llm::{LlmClient, OpenRouterClient};
    use crate::project::ProjectPipeline;
    use crate::throttle::LoginThrottle;
    use std::path::PathBuf;

    fn test_state(password: &str) -> Arc<AppState> {
        let config = Config::new(
            password.to_string(),
            "test-key".to_string(),
            PathBuf::from("/tmp"),
        );
        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new("test-key".to_string()));
        let budget = Arc::new(UsageBudget::new(config.max_usage_words));
        let pipeline = Arc::new(ProjectPipeline::new(
            llm.clone(),
            Arc::new(GitHubClient::new(None)),
            Arc::new(GitCli::new()),
            budget.clone(),
            config.workspace_path.clone(),
            config.default_model.clone(),
        ));
        Arc::new(AppState {
            throttle: LoginThrottle::new(),
            budget,
            llm,
            pipeline,
            config,
        })
    }

    fn peer() -> SocketAddr {
        "10.0.0.1:54321".parse().expect("valid socket address")
    }

    async fn attempt(state: &Arc<AppState>, headers: HeaderMap, password: &str) -> Response {
        login(
            State(state.clone()),
            ConnectInfo(peer()),
            headers,
            Json(LoginRequest {
                password: password.to_string(),
            }),
        )
        .await
    }

    async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = serde_json::from_slice(&bytes).expect("response body should be JSON");
        (status, json)
    }

    fn forwarded_for(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            value.parse().expect("valid header value"),
        );
        headers
    }

    // ── Identity resolution ──

    #[test]
    fn test_identity_prefers_first_forwarded_entry() {
        let headers = forwarded_for("203.0.113.9, 70.41.3.18, 150.172.238.178");
        assert_eq!(client_identity(&headers, peer()), "203.0.113.9");
    }

    #[test]
    fn test_identity_falls_back_to_peer_address() {
        assert_eq!(client_identity(&HeaderMap::new(), peer()), "10.0.0.1");
    }

    #[test]
    fn test_identity_ignores_empty_forwarded_header() {
        let headers = forwarded_for("");
        assert_eq!(client_identity(&headers, peer()), "10.0.0.1");
    }

    // ── Handler behaviour ──

    #[tokio::test]
    async fn test_correct_password_returns_success() {
        let state = test_state("hunter2");
        let response = attempt(&state, HeaderMap::new(), "hunter2").await;

        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"success": true}));
    }

    #[tokio::test]
    async fn test_wrong_password_returns_unauthorized() {
        let state = test_state("hunter2");
        let response = attempt(&state, HeaderMap::new(), "letmein").await;

        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "message": "Incorrect password"})
        );
    }

    #[tokio::test]
    async fn test_cooldown_blocks_even_the_correct_password() {
        let state = test_state("hunter2");
        // All five failures, the fifth included, are plain 401s.
        for _ in 0..5 {
            let response = attempt(&state, HeaderMap::new(), "wrong").await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = attempt(&state, HeaderMap::new(), "hunter2").await;
        let (status, body) = response_json(response).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "message": "Too many failed attempts. Try again later."
            })
        );
    }

    #[tokio::test]
    async fn test_forwarded_identities_are_throttled_independently() {
        let state = test_state("hunter2");
        for _ in 0..5 {
            attempt(&state, forwarded_for("203.0.113.9"), "wrong").await;
        }

        // The first identity is cooling down; a different one is not.
        let blocked = attempt(&state, forwarded_for("203.0.113.9"), "wrong").await;
        assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

        let fresh = attempt(&state, forwarded_for("198.51.100.4"), "wrong").await;
        assert_eq!(fresh.status(), StatusCode::UNAUTHORIZED);
    }
}
