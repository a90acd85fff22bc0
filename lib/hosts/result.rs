use reqwest::StatusCode;
use thiserror::Error;

/**
    Errors from talking to a release host.

    Request URLs are stripped from wrapped reqwest errors, since
    some hosts take credentials as query parameters.
*/
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to build client - invalid header value: {0}")]
    ReqwestHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("reqwest error: {0}")]
    Reqwest(reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(reqwest_middleware::Error),
    #[error("{operation} failed with status {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
}

impl From<reqwest::Error> for HostError {
    fn from(e: reqwest::Error) -> Self {
        Self::Reqwest(e.without_url())
    }
}

impl From<reqwest_middleware::Error> for HostError {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Self::Reqwest(e.without_url()),
            other @ reqwest_middleware::Error::Middleware(_) => Self::Middleware(other),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;
