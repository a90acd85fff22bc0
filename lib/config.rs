use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::recency::{DEFAULT_WINDOW_HOURS, SyncMode};

pub const ENV_GITHUB_TOKEN: &str = "INPUT_GITHUB_TOKEN";
pub const ENV_GITEE_TOKEN: &str = "INPUT_GITEE_TOKEN";
pub const ENV_GITEE_OWNER: &str = "INPUT_GITEE_OWNER";
pub const ENV_GITEE_REPO: &str = "INPUT_GITEE_REPO";
pub const ENV_GITEE_USERNAME: &str = "INPUT_GITEE_USERNAME";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_SYNC_MODE: &str = "INPUT_SYNC_MODE";
pub const ENV_WINDOW_HOURS: &str = "INPUT_WINDOW_HOURS";
pub const ENV_GITHUB_API_URL: &str = "INPUT_GITHUB_API_URL";
pub const ENV_GITEE_API_URL: &str = "INPUT_GITEE_API_URL";
pub const ENV_GITEE_HOST: &str = "INPUT_GITEE_HOST";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITEE_API_URL: &str = "https://gitee.com/api/v5";
pub const DEFAULT_GITEE_HOST: &str = "gitee.com";

/**
    A single problem found while validating configuration.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "{key} is not set"),
            Self::Invalid { key, reason } => write!(f, "{key} is invalid: {reason}"),
        }
    }
}

/**
    Every problem found in the configuration, reported together
    so that all of them can be fixed in one go.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ConfigError {
    pub problems: Vec<ConfigProblem>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration:")?;
        for problem in &self.problems {
            write!(f, "\n  - {problem}")?;
        }
        Ok(())
    }
}

/**
    Unvalidated configuration values, as gathered from command
    line arguments or their environment variable fallbacks.
*/
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    pub github_token: Option<String>,
    pub github_repository: Option<String>,
    pub github_api_url: Option<String>,
    pub gitee_token: Option<String>,
    pub gitee_owner: Option<String>,
    pub gitee_repo: Option<String>,
    pub gitee_username: Option<String>,
    pub gitee_api_url: Option<String>,
    pub gitee_host: Option<String>,
    pub sync_mode: Option<String>,
    pub window_hours: Option<String>,
}

/**
    Where releases are read from.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub token: String,
    /// The repository in `owner/name` form.
    pub repository: String,
    pub api_url: String,
}

/**
    Where the repository and its releases are mirrored to.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Username used to authenticate git pushes.
    pub username: String,
    pub api_url: String,
    /// Host used for git pushes, without scheme.
    pub git_host: String,
}

/**
    Validated configuration for a complete mirror run.

    Constructed once at startup and passed to every operation that needs it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    pub mode: SyncMode,
}

impl MirrorConfig {
    /**
        Validates the given raw configuration.

        # Errors

        - If any required value is missing or empty, or any value is
          malformed. All problems are collected into a single error.
    */
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let mut required = |key: &'static str, value: Option<String>| match non_empty(value) {
            Some(value) => value,
            None => {
                problems.push(ConfigProblem::Missing(key));
                String::new()
            }
        };

        let github_token = required(ENV_GITHUB_TOKEN, raw.github_token);
        let gitee_token = required(ENV_GITEE_TOKEN, raw.gitee_token);
        let gitee_owner = required(ENV_GITEE_OWNER, raw.gitee_owner);
        let gitee_repo = required(ENV_GITEE_REPO, raw.gitee_repo);
        let gitee_username = required(ENV_GITEE_USERNAME, raw.gitee_username);
        let github_repository = required(ENV_GITHUB_REPOSITORY, raw.github_repository);

        if !github_repository.is_empty() && !is_owner_and_name(&github_repository) {
            problems.push(ConfigProblem::Invalid {
                key: ENV_GITHUB_REPOSITORY,
                reason: format!("expected 'owner/name', got '{github_repository}'"),
            });
        }

        let mode = match parse_sync_mode(raw.sync_mode, raw.window_hours) {
            Ok(mode) => mode,
            Err(problem) => {
                problems.push(problem);
                SyncMode::default()
            }
        };

        if !problems.is_empty() {
            return Err(ConfigError { problems });
        }

        let config = Self {
            source: SourceConfig {
                token: github_token,
                repository: github_repository,
                api_url: url_or_default(raw.github_api_url, DEFAULT_GITHUB_API_URL),
            },
            destination: DestinationConfig {
                token: gitee_token,
                owner: gitee_owner,
                repo: gitee_repo,
                username: gitee_username,
                api_url: url_or_default(raw.gitee_api_url, DEFAULT_GITEE_API_URL),
                git_host: non_empty(raw.gitee_host)
                    .unwrap_or_else(|| DEFAULT_GITEE_HOST.to_string()),
            },
            mode,
        };

        debug!(
            source = %config.source.repository,
            destination = %format!("{}/{}", config.destination.owner, config.destination.repo),
            mode = ?config.mode,
            "loaded mirror configuration"
        );

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn url_or_default(value: Option<String>, default: &str) -> String {
    non_empty(value)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn is_owner_and_name(repository: &str) -> bool {
    match repository.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

fn parse_sync_mode(
    mode: Option<String>,
    window_hours: Option<String>,
) -> Result<SyncMode, ConfigProblem> {
    let hours = match non_empty(window_hours) {
        None => DEFAULT_WINDOW_HOURS,
        Some(s) => match s.parse::<u32>() {
            Ok(h) if h > 0 => h,
            _ => {
                return Err(ConfigProblem::Invalid {
                    key: ENV_WINDOW_HOURS,
                    reason: format!("expected a positive number of hours, got '{s}'"),
                });
            }
        },
    };

    let mode = non_empty(mode).map(|m| m.to_lowercase());
    match mode.as_deref() {
        None | Some("recent") => Ok(SyncMode::recent_hours(hours)),
        Some("full") => Ok(SyncMode::Full),
        Some(other) => Err(ConfigProblem::Invalid {
            key: ENV_SYNC_MODE,
            reason: format!("expected 'recent' or 'full', got '{other}'"),
        }),
    }
}
