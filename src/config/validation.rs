//! Configuration validation.
//!
//! Pure function: `FeedConfig → Result<(), Vec<ValidationError>>`. Runs after
//! CLI overrides are applied, before anything is built from the config.

use thiserror::Error;
use url::Url;

use crate::config::schema::FeedConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("remote.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("remote.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("remote.base_url '{0}' must end with '/'")]
    MissingTrailingSlash(String),

    #[error("remote.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check the configuration, collecting every error.
pub fn validate_config(config: &FeedConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let remote = &config.remote;

    match Url::parse(&remote.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(remote.base_url.clone()));
            }
            if !url.path().ends_with('/') {
                errors.push(ValidationError::MissingTrailingSlash(remote.base_url.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidBaseUrl(remote.base_url.clone())),
    }

    if remote.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }
    if remote.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_timeout_secs"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
