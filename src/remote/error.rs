//! Fetch error definitions.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching the user list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection could not be made or the request broke mid-flight.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// No complete response within the request timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The body did not parse as a list of users.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Connectivity, timeout or non-success status.
    Transport,
    /// Malformed response body.
    Decode,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Decode => "decode",
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    /// Which side of the boundary failed.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport(_) | FetchError::Status { .. } | FetchError::Timeout(_) => {
                FetchErrorKind::Transport
            }
            FetchError::Decode(_) => FetchErrorKind::Decode,
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
