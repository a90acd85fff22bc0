use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with code {code}\n{stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
}

pub type ReplicationResult<T> = Result<T, ReplicationError>;
