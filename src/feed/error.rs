use std::time::Duration;
use thiserror::Error;

/// Failures of a network round-trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("gateway answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl TransportError {
    /// Maps a reqwest failure, folding its timeout flag into `Timeout`.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout(timeout);
        }
        match err.status() {
            Some(status) => TransportError::Status(status),
            None => TransportError::Request(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    /// Rejected before reaching the client, e.g. an empty prompt.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A pushed message that does not decode. The message is dropped.
    #[error("malformed event payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The live subscription lost its transport and will not recover.
    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FeedError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport(_))
    }
}

pub type FeedResult<T> = Result<T, FeedError>;
