use thiserror::Error;

/// Top-level error type for the `sentra-api` crate.
///
/// The gateway treats any non-2xx status as failure regardless of body
/// content, so the taxonomy is deliberately flat: transport problems,
/// status failures, and payloads we could not decode.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON deserialization failed, with a body preview for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Local filesystem error while staging an upload or saving a download.
    #[error("File error: {0}")]
    File(#[from] std::io::Error),
}

impl Error {
    /// The HTTP status code, if this failure carries one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for failures that never reached the gateway.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect() || e.is_timeout())
    }
}
