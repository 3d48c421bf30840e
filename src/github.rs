//! Repository host provider (GitHub REST).
//!
//! Creates remote repositories through `POST /user/repos`. The token is
//! optional at startup; a missing token fails here, at call time, so the
//! rest of the server keeps working without one.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GITHUB_API_URL: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RepoHostError {
    #[error("GitHub token not found. Please set the GITHUB_TOKEN environment variable.")]
    MissingToken,

    #[error("Repository host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Repository host returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

/// A freshly provisioned remote repository.
#[derive(Debug, Clone)]
pub struct CreatedRepository {
    pub clone_url: String,
}

/// The single operation the pipeline needs from the repository host.
#[async_trait]
pub trait RepoHost: Send + Sync {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<CreatedRepository, RepoHostError>;
}

/// Client for the GitHub REST API.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }
}

#[derive(Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

#[derive(Deserialize)]
struct CreateRepoResponse {
    clone_url: String,
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw text when the body is not the expected JSON shape.
fn extract_api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiErrorBody {
        message: String,
    }
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<CreatedRepository, RepoHostError> {
        let token = self.token.as_deref().ok_or(RepoHostError::MissingToken)?;

        tracing::info!(repository = %name, private, "Creating remote repository");

        let response = self
            .client
            .post(format!("{}/user/repos", GITHUB_API_URL))
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "shipwright")
            .timeout(REQUEST_TIMEOUT)
            .json(&CreateRepoRequest {
                name,
                description,
                private,
                // Initialize with a default branch so the fresh clone has
                // something to commit onto.
                auto_init: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepoHostError::Api {
                status: status.as_u16(),
                message: extract_api_message(&body),
            });
        }

        let created: CreateRepoResponse = response.json().await?;
        tracing::info!(repository = %name, clone_url = %created.clone_url, "Remote repository created");
        Ok(CreatedRepository {
            clone_url: created.clone_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_fails_at_call_time() {
        let client = GitHubClient::new(None);
        let result = client.create_repository("demo", "a demo", true).await;
        assert!(matches!(result, Err(RepoHostError::MissingToken)));
    }

    #[test]
    fn test_create_request_serialization() {
        let request = CreateRepoRequest {
            name: "music-maker",
            description: "An AI-generated project with the goal: make music",
            private: true,
            auto_init: true,
        };
        let json = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(json["name"], "music-maker");
        assert_eq!(json["private"], true);
        assert_eq!(json["auto_init"], true);
    }

    #[test]
    fn test_extract_api_message_prefers_json_field() {
        let body = r#"{"message":"name already exists on this account","errors":[]}"#;
        assert_eq!(extract_api_message(body), "name already exists on this account");
        assert_eq!(extract_api_message("  plain failure  "), "plain failure");
    }

    #[test]
    fn test_clone_url_decoding() {
        let body = r#"{"clone_url":"https://github.com/me/demo.git","id":1,"name":"demo"}"#;
        let parsed: CreateRepoResponse = serde_json::from_str(body).expect("decode body");
        assert_eq!(parsed.clone_url, "https://github.com/me/demo.git");
    }
}
