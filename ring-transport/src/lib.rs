//! Private HTTPS transport for the Ring cloud API
//!
//! This crate provides the narrow request/response capability the higher
//! layers talk through. It knows nothing about sessions, tokens or JSON; it
//! sends a request and hands back the status code and body text.
//!
//! The production implementation is [`UreqTransport`]. Tests inject a
//! [`MockTransport`] (feature `test-support`) implementing the same trait.

mod error;
#[cfg(any(test, feature = "test-support"))]
mod mock;

pub use error::TransportError;
#[cfg(any(test, feature = "test-support"))]
pub use mock::{MockTransport, RecordedRequest};

use std::fmt;
use std::time::Duration;

/// HTTP method used by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status code and body text of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking request/response capability
///
/// Implementations own TLS, connection reuse, timeouts and any
/// transport-level retry policy. Callers see one request per call.
pub trait Transport: Send + Sync {
    /// Send a GET request
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;

    /// Send a POST request with a text body
    fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a blocking `ureq` agent
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport with the default timeouts (5s connect, 10s read)
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a transport with custom connect and read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.agent.request(method.as_str(), url);
        for (name, value) in headers {
            request = request.set(name, value);
        }

        let result = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };

        let response = match result {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors; at this layer they are plain responses
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(match err.kind() {
                    ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
                        TransportError::InvalidRequest(err.to_string())
                    }
                    _ => TransportError::Network(err.to_string()),
                });
            }
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        tracing::trace!(%method, status, bytes = body.len(), "request completed");

        Ok(HttpResponse { status, body })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        self.send(Method::Get, url, headers, None)
    }

    fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.send(Method::Post, url, headers, Some(body))
    }
}
