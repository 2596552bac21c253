//! Error types for the QuickProto client.
//!
//! These are diagnostics only: the session controller logs them and shows the user a
//! generic per-flow message instead.

use thiserror::Error;

/// Result alias for calls against the remote generation/quote services.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a single remote call (generation or quote).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. The body is never interpreted.
    #[error("service responded with status {0}")]
    Status(u16),

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// True for failures where the service answered but with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, ServiceError::Status(_))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}
