use thiserror::Error;

use crate::{config::ConfigError, hosts::HostError, replication::ReplicationError};

/**
    Errors that abort a mirror run.

    Failures that only affect a single release or asset are never
    represented here - they are recorded in the run report instead.
*/
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("failed to mirror repository refs: {0}")]
    Replication(#[from] ReplicationError),
    #[error("failed to create host client: {0}")]
    Client(#[source] HostError),
    #[error("failed to fetch releases from source host: {0}")]
    SourceReleases(#[source] HostError),
    #[error("failed to fetch releases from destination host: {0}")]
    DestinationReleases(#[source] HostError),
}

pub type MirrorResult<T> = Result<T, MirrorError>;
