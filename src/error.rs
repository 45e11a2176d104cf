use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an external collaborator (network API, git, file system).
///
/// These never abort a turn. The dispatcher renders them as assistant messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapabilityError {
    #[error("missing or rejected credential: {0}")]
    Unauthenticated(String),

    #[error("rate limit exceeded, configure a token or try again later")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("io error: {0}")]
    Io(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service error: {0}")]
    Api(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CapabilityError::Timeout
        } else if err.is_connect() || err.is_request() {
            CapabilityError::Network(err.to_string())
        } else if err.is_decode() {
            CapabilityError::Parse(err.to_string())
        } else {
            CapabilityError::Api(err.to_string())
        }
    }
}

impl From<std::io::Error> for CapabilityError {
    fn from(err: std::io::Error) -> Self {
        CapabilityError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CapabilityError {
    fn from(err: serde_json::Error) -> Self {
        CapabilityError::Parse(err.to_string())
    }
}

/// Errors while loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
