//! HTTP implementation of [`UserSource`].
//!
//! # Responsibilities
//! - Resolve the `users` resource against the configured base URL
//! - Issue a single GET per call with the configured timeouts
//! - Map transport, status and body failures onto [`FetchError`]

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::RemoteConfig;
use crate::model::UserList;
use crate::remote::error::{FetchError, FetchResult};
use crate::remote::source::UserSource;

/// Resource path of the user collection, relative to the base URL.
pub const USERS_PATH: &str = "users";

/// Errors raised while building an [`HttpUserSource`].
#[derive(Debug, Error)]
pub enum SourceInitError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches users from `GET {base_url}users`.
#[derive(Clone)]
pub struct HttpUserSource {
    client: reqwest::Client,
    users_url: Url,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl HttpUserSource {
    /// Build a source from the `[remote]` configuration section.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, SourceInitError> {
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|source| SourceInitError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Self::with_client(client, &base_url, connect_timeout, request_timeout)
    }

    /// Build a source around an existing client.
    ///
    /// The timeouts are only used to report [`FetchError::Timeout`]; the
    /// client enforces its own.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &Url,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, SourceInitError> {
        let users_url = base_url
            .join(USERS_PATH)
            .map_err(|source| SourceInitError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            })?;

        tracing::debug!(url = %users_url, "User source configured");

        Ok(Self {
            client,
            users_url,
            connect_timeout,
            request_timeout,
        })
    }

    /// The fully resolved URL this source requests.
    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    async fn get_users(&self) -> FetchResult<UserList> {
        tracing::debug!(url = %self.users_url, "Requesting user list");

        let response = self
            .client
            .get(self.users_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.users_url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let users: UserList = serde_json::from_str(&body)?;

        tracing::debug!(url = %self.users_url, count = users.len(), "User list received");
        Ok(users)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_for(err.is_connect()))
        } else {
            FetchError::Transport(err)
        }
    }

    /// The limit that expired: connect timeouts surface as connect errors.
    fn timeout_for(&self, during_connect: bool) -> Duration {
        if during_connect {
            self.connect_timeout
        } else {
            self.request_timeout
        }
    }
}

impl UserSource for HttpUserSource {
    fn fetch_users(&self) -> BoxFuture<'_, FetchResult<UserList>> {
        self.get_users().boxed()
    }
}

impl std::fmt::Debug for HttpUserSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUserSource")
            .field("users_url", &self.users_url.as_str())
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: base_url.to_string(),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn test_users_url_is_relative_to_base() {
        let source = HttpUserSource::from_config(&test_config("http://localhost:9000/api/v1/")).unwrap();
        assert_eq!(source.users_url().as_str(), "http://localhost:9000/api/v1/users");
    }

    #[test]
    fn test_timeout_matches_failed_phase() {
        let config = RemoteConfig {
            connect_timeout_secs: 2,
            request_timeout_secs: 9,
            ..test_config("http://localhost:9000/")
        };
        let source = HttpUserSource::from_config(&config).unwrap();
        assert_eq!(source.timeout_for(true), Duration::from_secs(2));
        assert_eq!(source.timeout_for(false), Duration::from_secs(9));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpUserSource::from_config(&test_config("not a url"));
        assert!(matches!(result, Err(SourceInitError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) is closed on any sane test host.
        let source = HttpUserSource::from_config(&test_config("http://127.0.0.1:9/")).unwrap();
        let err = source.fetch_users().await.unwrap_err();
        assert_eq!(err.kind(), crate::remote::FetchErrorKind::Transport);
    }
}
