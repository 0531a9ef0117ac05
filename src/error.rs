use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::fmt;

/// Message shown to the user whenever a repository search fails.
pub const SEARCH_ERROR_MESSAGE: &str = "Unable to fetch repositories. Please try again later.";

/// Failure of a single request against the github api.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("rate limit exhausted for {url}, resets at {reset}")]
    RateLimited { url: String, reset: DateTime<Utc> },
    #[error("unexpected response body from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for request header '{name}': {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}

/// What a failed search leaves behind for the user: a fixed message plus
/// the underlying cause, kept for logs and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub cause: String,
}

impl ErrorInfo {
    pub fn search_failed(err: &FetchError) -> Self {
        ErrorInfo {
            message: SEARCH_ERROR_MESSAGE.to_owned(),
            cause: err.to_string(),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.cause)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse config file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Returned when an event is pushed into a pipeline that already stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pipeline is no longer running")]
pub struct PipelineClosed;
