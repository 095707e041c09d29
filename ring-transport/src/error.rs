//! Error types for the transport layer

use thiserror::Error;

/// Errors that can occur before a response is received
///
/// A non-2xx status is not an error at this layer; it is returned as a
/// regular [`HttpResponse`](crate::HttpResponse) for the caller to judge.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The request could not be built (bad URL, bad header)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}
