//! Version-control executor.
//!
//! Runs `git` as a subprocess with piped output and a bounded timeout.
//! Non-zero exits carry the command's stderr so pipeline failures relay the
//! raw tool text. The [`VersionControl`] trait is the seam the project
//! pipeline depends on; tests substitute a recording fake.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Upper bound for any single git invocation (clone included).
const GIT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to run git: {0}")]
    Spawn(std::io::Error),

    #[error("Git command timed out after {0} seconds")]
    Timeout(u64),

    #[error("Git error: {0}")]
    Failed(String),
}

/// The version-control operations the project pipeline needs.
#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError>;
    async fn stage_all(&self, workdir: &Path) -> Result<(), VcsError>;
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), VcsError>;
    async fn push(&self, workdir: &Path, branch: &str) -> Result<(), VcsError>;
}

/// Executor shelling out to the `git` CLI.
pub struct GitCli {
    timeout: Duration,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            timeout: GIT_TIMEOUT,
        }
    }

    async fn run(&self, args: &[&str], workdir: &Path) -> Result<String, VcsError> {
        tracing::debug!(?args, workdir = %workdir.display(), "Running git command");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new("git")
                .args(args)
                .current_dir(workdir)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| VcsError::Timeout(self.timeout.as_secs()))?
        .map_err(VcsError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            if stderr.trim().is_empty() {
                return Err(VcsError::Failed(stdout.trim().to_string()));
            }
            return Err(VcsError::Failed(stderr.trim().to_string()));
        }

        Ok(stdout.to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
        // Clone runs from the destination's parent; the pipeline has already
        // created the workspace root.
        let cwd = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dest_str = dest.to_string_lossy();
        self.run(&["clone", url, dest_str.as_ref()], cwd).await?;
        Ok(())
    }

    async fn stage_all(&self, workdir: &Path) -> Result<(), VcsError> {
        self.run(&["add", "-A"], workdir).await?;
        Ok(())
    }

    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), VcsError> {
        self.run(&["commit", "-m", message], workdir).await?;
        Ok(())
    }

    async fn push(&self, workdir: &Path, branch: &str) -> Result<(), VcsError> {
        self.run(&["push", "origin", branch], workdir).await?;
        Ok(())
    }
}
