use thiserror::Error;
use transport::TransportError;

/// High-level API errors for Ring operations
///
/// Each variant names the operation family that failed, so callers can tell
/// a rejected login apart from a broken device listing without inspecting
/// status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad credentials, a non-2xx session response, or a malformed profile body
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The device listing could not be fetched or parsed
    ///
    /// `status` is set when the server answered with a non-2xx status.
    #[error("Device catalog error: {reason}")]
    Catalog { reason: String, status: Option<u16> },

    /// An accessor was used on a record that lacks the underlying field
    #[error("Missing field: {0}")]
    FieldMissing(String),

    /// A history query was rejected or returned an unreadable body
    #[error("History query failed: {0}")]
    History(String),

    /// A device-level request (chime sound, linked devices) failed
    #[error("Device request failed: {0}")]
    Device(String),

    /// Reading or writing the persisted session failed
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A request URL could not be built from the configured base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An authorized call was attempted before a session exists
    #[error("Not authenticated")]
    NotConnected,

    /// Failure reported by the transport, passed through untouched
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    pub(crate) fn catalog(reason: impl Into<String>) -> Self {
        Self::Catalog {
            reason: reason.into(),
            status: None,
        }
    }

    pub(crate) fn catalog_status(status: u16) -> Self {
        Self::Catalog {
            reason: format!("device listing returned HTTP {}", status),
            status: Some(status),
        }
    }

    /// True when the server rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Catalog { status: Some(401), .. })
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
