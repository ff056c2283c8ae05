//! Failure classification for inter-service calls
//!
//! These never reach the caller of [`ServiceClient::call`](crate::ServiceClient::call);
//! they exist for logs and for [`try_call`](crate::ServiceClient::try_call).

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError {
    /// Peer answered with anything but `200`
    #[error("unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    /// Connection refused, DNS failure, reset, or body read failure
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// Token contains bytes not allowed in an HTTP header
    #[error("session token is not a valid header value")]
    InvalidSession,

    #[error("path template {template} expects {expected} parameters, got {given}")]
    InvalidTarget {
        template: String,
        expected: usize,
        given: usize,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CallError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::UnexpectedStatus(_) => "status",
            CallError::Transport(e) if e.is_timeout() => "timeout",
            CallError::Transport(e) if e.is_connect() => "connect",
            CallError::Transport(_) => "transport",
            CallError::Timeout(_) => "timeout",
            CallError::InvalidSession => "invalid_session",
            CallError::InvalidTarget { .. } => "invalid_target",
            CallError::Encode(_) => "encode",
        }
    }

    /// The peer answered, just not with `200`.
    pub fn is_status(&self) -> bool {
        matches!(self, CallError::UnexpectedStatus(_))
    }
}

#[derive(Debug, Error)]
pub enum ServiceClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Timeouts must be positive whole milliseconds
    #[error("invalid {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
}
