use std::time::Duration;

use thiserror::Error;

/// Failure of one push-channel connection. Never fatal: the subscription
/// logs it and reconnects.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("connect failed: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("stream read failed: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission timed out")]
    Timeout,
    #[error("submission failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to read submission response: {0}")]
    Body(#[source] reqwest::Error),
}

impl SubmitError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SubmitError::Timeout
        } else {
            SubmitError::Transport(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportsError {
    #[error("report listing request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("report listing returned http status {0}")]
    HttpStatus(u16),
    #[error("report listing is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("monitor has stopped")]
    Stopped,
    #[error("event stream not connected after {0:?}")]
    NotConnected(Duration),
}
