use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use super::{PushDestination, ReplicationError, ReplicationResult, RepositoryReplicator};

const DEFAULT_COMMITTER_NAME: &str = "GitHub Actions";
const DEFAULT_COMMITTER_EMAIL: &str = "actions@github.com";

/**
    Replicates a local repository by invoking the `git` binary.
*/
#[derive(Debug, Clone)]
pub struct GitReplicator {
    repo_dir: PathBuf,
    committer_name: String,
    committer_email: String,
}

impl GitReplicator {
    /**
        Creates a replicator for the repository checked out at `repo_dir`.
    */
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            committer_name: DEFAULT_COMMITTER_NAME.to_string(),
            committer_email: DEFAULT_COMMITTER_EMAIL.to_string(),
        }
    }

    /**
        Runs git with the given arguments, returning its stdout.

        The command line and output are logged with the access token redacted.
    */
    async fn git(&self, args: &[&str], destination: &PushDestination) -> ReplicationResult<String> {
        let command = destination.redact(&format!("git {}", args.join(" ")));
        debug!(%command, "executing");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|source| ReplicationError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = destination.redact(&String::from_utf8_lossy(&output.stdout));
        let stderr = destination.redact(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ReplicationError::CommandFailed {
                command,
                code: output.status.code().unwrap_or(1),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stdout.trim().is_empty() {
            debug!(%command, stdout = %stdout.trim(), "command output");
        }
        // Git writes push progress to stderr even when successful
        if !stderr.trim().is_empty() {
            debug!(%command, stderr = %stderr.trim(), "command output");
        }

        Ok(stdout)
    }

    async fn ensure_remote(&self, destination: &PushDestination) -> ReplicationResult<()> {
        let remote = destination.remote_name.as_str();
        let url = destination.remote_url();
        match self.git(&["remote", "get-url", remote], destination).await {
            Ok(_) => {
                self.git(&["remote", "set-url", remote, &url], destination)
                    .await?;
                debug!(remote, "updated existing remote");
            }
            Err(ReplicationError::CommandFailed { .. }) => {
                self.git(&["remote", "add", remote, &url], destination)
                    .await?;
                debug!(remote, "added remote");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryReplicator for GitReplicator {
    #[instrument(skip(self, destination), fields(remote = %destination.remote_name), level = "debug")]
    async fn mirror_all_refs(&self, destination: &PushDestination) -> ReplicationResult<()> {
        info!(
            destination = %format!("{}/{}/{}", destination.host, destination.owner, destination.repo),
            "Mirroring repository refs"
        );

        self.git(&["config", "user.name", &self.committer_name], destination)
            .await?;
        self.git(&["config", "user.email", &self.committer_email], destination)
            .await?;

        self.ensure_remote(destination).await?;

        let remote = destination.remote_name.as_str();
        self.git(&["push", "--all", remote, "-f"], destination)
            .await?;
        info!("Pushed all branches");
        self.git(&["push", "--tags", remote, "-f"], destination)
            .await?;
        info!("Pushed all tags");

        Ok(())
    }
}
