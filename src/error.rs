use thiserror::Error;

/// Errors that can occur while resolving a URL into PNG bytes.
///
/// The type is `Clone` because a single in-flight conversion delivers the same
/// outcome to every request waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The `url` parameter is missing, empty, or not an absolute http(s) URL
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Network failure, timeout, or a non-success status from the upstream server
    #[error("Fetch failed: {message}")]
    FetchFailed {
        /// Upstream HTTP status, when the server answered at all
        status: Option<u16>,
        message: String,
    },

    /// The fetched bytes are not a decodable TIFF image
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    /// PNG encoding failed after a successful decode
    #[error("Failed to encode image: {message}")]
    EncodeFailed { message: String },

    /// A conversion task panicked or was torn down before reporting back
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConvertError {
    /// Create an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a `FetchFailed` error carrying an upstream status.
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a `FetchFailed` error for a transport-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Create an `Internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short machine-readable identifier for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::DecodeFailed { .. } => "decode_failed",
            Self::EncodeFailed { .. } => "encode_failed",
            Self::Internal { .. } => "internal_error",
        }
    }
}
