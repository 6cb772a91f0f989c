//! Error types for Hub operations
//!
//! These errors carry the diagnostic detail of a failed remote call. The
//! build steps log them and convert each one into a single user-facing
//! `BuildError`.

use std::fmt;
use std::io;

/// Result type alias for Hub operations
pub type HubResult<T> = std::result::Result<T, HubError>;

/// Unified error type for Hub operations
#[derive(Debug)]
pub enum HubError {
    /// The request never produced a response (DNS, connect, timeout)
    Transport {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The Hub answered with a non-success status
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape
    Decode { url: String, message: String },

    /// The identifier does not name a space or a model
    UnsupportedIdentifier { identifier: String, reason: String },

    /// The model has no pipeline tag, or one without a known interface
    UnsupportedPipeline {
        model: String,
        tag: Option<String>,
    },

    /// Local I/O while preparing a request
    Io(io::Error),

    /// Generic error with context
    Other(String),
}

impl HubError {
    /// Check if this error is retriable (transient)
    pub fn is_retriable(&self) -> bool {
        match self {
            HubError::Transport { .. } => true,
            HubError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the Hub rejected the credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self, HubError::Status { status: 401 | 403, .. })
    }

    /// Check if this error indicates the resource was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, HubError::Status { status: 404, .. })
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            HubError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubError::Transport { url, source } => {
                write!(f, "Request to {} failed: {}", url, source)
            }
            HubError::Status { url, status, body } => {
                if body.is_empty() {
                    write!(f, "{} returned HTTP {}", url, status)
                } else {
                    write!(f, "{} returned HTTP {}: {}", url, status, body)
                }
            }
            HubError::Decode { url, message } => {
                write!(f, "Unexpected response from {}: {}", url, message)
            }
            HubError::UnsupportedIdentifier { identifier, reason } => {
                write!(f, "Unsupported identifier '{}': {}", identifier, reason)
            }
            HubError::UnsupportedPipeline { model, tag } => match tag {
                Some(tag) => write!(f, "Model {} has unsupported pipeline '{}'", model, tag),
                None => write!(f, "Model {} has no pipeline tag", model),
            },
            HubError::Io(err) => write!(f, "I/O error: {}", err),
            HubError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for HubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HubError::Transport { source, .. } => Some(source.as_ref()),
            HubError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for HubError {
    fn from(err: io::Error) -> Self {
        HubError::Io(err)
    }
}
