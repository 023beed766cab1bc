use thiserror::Error;

/// Unified error type for release-ci operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Unable to resolve revision '{spec}': {detail}")]
    Revision { spec: String, detail: String },

    #[error("error {description}: {detail}")]
    Command { description: String, detail: String },

    #[error("Commit traversal failed: {0}")]
    Traversal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience type alias for Results in release-ci
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a command error carrying the failed operation's description
    pub fn command(description: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseError::Command {
            description: description.into(),
            detail: detail.into(),
        }
    }

    /// Create a traversal error with context
    pub fn traversal(msg: impl Into<String>) -> Self {
        ReleaseError::Traversal(msg.into())
    }
}
