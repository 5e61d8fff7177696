//! Row source error types

/// Errors reported by a [`RowSource`](crate::source::RowSource).
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The request never reached the server or the connection broke.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a failure.
    #[error("Server error {status}: {message}")]
    Server {
        /// Status code reported by the server.
        status: u16,
        /// Error message.
        message: String,
    },

    /// A response could not be turned into rows.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl SourceError {
    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a new server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a new decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns the server status code if this is a server error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if repeating the request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Transport(_) => true,
            Self::Decode { .. } => false,
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}
