//! Error types for document fetching

use std::fmt;

/// Why a document could not be made available locally.
///
/// Cloneable so one failed download can be reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No source location was given and nothing is cached under the fallback key
    NoSource,
    /// The source location is not an absolute http(s) URL
    InvalidUrl(String),
    /// Connection, TLS, timeout or body-stream failure
    Network(String),
    /// The server answered with something other than 200
    Status(u16),
    /// Local filesystem failure
    Storage(String),
}

impl FetchError {
    /// True for the "nothing to fetch" outcomes: no source, or a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NoSource | FetchError::Status(404))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, FetchError::Storage(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NoSource => write!(f, "No source location"),
            FetchError::InvalidUrl(msg) => write!(f, "Invalid source URL: {}", msg),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Status(code) => write!(f, "Unexpected HTTP status {}", code),
            FetchError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Storage(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
