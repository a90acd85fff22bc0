use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use release_mirror::{
    config::{
        ENV_GITEE_API_URL, ENV_GITEE_HOST, ENV_GITEE_OWNER, ENV_GITEE_REPO, ENV_GITEE_TOKEN,
        ENV_GITEE_USERNAME, ENV_GITHUB_API_URL, ENV_GITHUB_REPOSITORY, ENV_GITHUB_TOKEN,
        ENV_SYNC_MODE, ENV_WINDOW_HOURS, MirrorConfig, RawConfig,
    },
    hosts::{gitee::GiteeDestination, github::GithubSource},
    mirror::Mirror,
    recency::RecencyFilter,
    replication::{GitReplicator, PushDestination, RepositoryReplicator},
    result::MirrorError,
};

/// Mirrors the repository and its recent releases from GitHub to Gitee.
#[derive(Debug, Parser)]
pub struct SyncSubcommand {
    /// Token used to read releases from GitHub.
    #[clap(long, env = ENV_GITHUB_TOKEN, hide_env_values = true)]
    pub github_token: Option<String>,
    /// Source repository, in `owner/name` form.
    #[clap(long, env = ENV_GITHUB_REPOSITORY)]
    pub github_repository: Option<String>,
    /// Base URL of the GitHub REST API.
    #[clap(long, env = ENV_GITHUB_API_URL)]
    pub github_api_url: Option<String>,
    /// Token used for both Gitee API calls and git pushes.
    #[clap(long, env = ENV_GITEE_TOKEN, hide_env_values = true)]
    pub gitee_token: Option<String>,
    /// Owner of the destination repository.
    #[clap(long, env = ENV_GITEE_OWNER)]
    pub gitee_owner: Option<String>,
    /// Name of the destination repository.
    #[clap(long, env = ENV_GITEE_REPO)]
    pub gitee_repo: Option<String>,
    /// Username used to authenticate git pushes.
    #[clap(long, env = ENV_GITEE_USERNAME)]
    pub gitee_username: Option<String>,
    /// Base URL of the Gitee REST API.
    #[clap(long, env = ENV_GITEE_API_URL)]
    pub gitee_api_url: Option<String>,
    /// Host that git pushes go to.
    #[clap(long, env = ENV_GITEE_HOST)]
    pub gitee_host: Option<String>,
    /// Either `recent` or `full`.
    #[clap(long, env = ENV_SYNC_MODE)]
    pub sync_mode: Option<String>,
    /// How far back `recent` mode looks, in hours.
    #[clap(long, env = ENV_WINDOW_HOURS)]
    pub window_hours: Option<String>,
    /// Only mirror releases, do not push any refs.
    #[clap(long)]
    pub skip_repository: bool,
    /// Log what would be synced without changing anything.
    #[clap(long)]
    pub dry_run: bool,
    /// Local git checkout to push refs from.
    #[clap(long, default_value = ".")]
    pub repo_dir: PathBuf,
}

impl SyncSubcommand {
    pub async fn run(self) -> Result<()> {
        let config = MirrorConfig::from_raw(self.raw_config()).map_err(MirrorError::from)?;
        let filter = RecencyFilter::new(config.mode, Utc::now());

        let source = GithubSource::new(&config.source).map_err(MirrorError::Client)?;
        let destination =
            GiteeDestination::new(&config.destination).map_err(MirrorError::Client)?;
        let mirror = Mirror::new(&source, &destination, filter);

        if self.dry_run {
            let plan = mirror.plan().await?;
            if plan.is_empty() {
                info!("Dry run - no releases to sync");
            }
            for planned in plan.iter() {
                info!("Dry run - would {planned}");
            }
            info!("Dry run - {} release(s) skipped", plan.skipped());
            return Ok(());
        }

        if self.skip_repository {
            info!("Skipping repository mirroring");
        } else {
            let push_destination = PushDestination::from_config(&config.destination);
            GitReplicator::new(&self.repo_dir)
                .mirror_all_refs(&push_destination)
                .await
                .map_err(MirrorError::from)
                .with_context(|| {
                    format!(
                        "Failed to mirror '{}' to {}/{}",
                        self.repo_dir.display(),
                        push_destination.owner,
                        push_destination.repo
                    )
                })?;
            info!("Repository mirrored successfully");
        }

        let report = mirror.run().await?;
        if !report.is_clean() {
            warn!(
                "Some releases or assets could not be mirrored:\
                \n{report}\
                \nThey will be retried on the next run."
            );
        }

        Ok(())
    }

    fn raw_config(&self) -> RawConfig {
        RawConfig {
            github_token: self.github_token.clone(),
            github_repository: self.github_repository.clone(),
            github_api_url: self.github_api_url.clone(),
            gitee_token: self.gitee_token.clone(),
            gitee_owner: self.gitee_owner.clone(),
            gitee_repo: self.gitee_repo.clone(),
            gitee_username: self.gitee_username.clone(),
            gitee_api_url: self.gitee_api_url.clone(),
            gitee_host: self.gitee_host.clone(),
            sync_mode: self.sync_mode.clone(),
            window_hours: self.window_hours.clone(),
        }
    }
}
