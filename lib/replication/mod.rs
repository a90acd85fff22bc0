use async_trait::async_trait;

use crate::config::DestinationConfig;

mod git;
mod result;

pub use self::git::GitReplicator;
pub use self::result::{ReplicationError, ReplicationResult};

pub const DEFAULT_REMOTE_NAME: &str = "gitee";

/**
    Where all refs of the local repository get pushed to.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDestination {
    pub remote_name: String,
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub username: String,
    pub token: String,
}

impl PushDestination {
    #[must_use]
    pub fn from_config(config: &DestinationConfig) -> Self {
        Self {
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
            host: config.git_host.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            username: config.username.clone(),
            token: config.token.clone(),
        }
    }

    /**
        The authenticated HTTPS URL of the destination repository.

        Contains the access token, and must never be logged as-is.
    */
    #[must_use]
    pub fn remote_url(&self) -> String {
        format!(
            "https://{}:{}@{}/{}/{}.git",
            self.username, self.token, self.host, self.owner, self.repo
        )
    }

    /**
        Replaces every occurrence of the access token in `text`.
    */
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        if self.token.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.token, "***")
        }
    }
}

/**
    Replicates the underlying version-controlled repository to the destination.

    Releases reference commits and tags that must exist on the destination,
    so this must complete successfully before any release is mirrored.
*/
#[async_trait]
pub trait RepositoryReplicator: Send + Sync {
    /**
        Force-pushes all branches and tags, overwriting the destination.
    */
    async fn mirror_all_refs(&self, destination: &PushDestination) -> ReplicationResult<()>;
}
