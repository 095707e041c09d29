//! In-memory transport for tests
//!
//! Routes requests by method and URL path prefix to canned responses and
//! records every request it sees.

use std::sync::{Mutex, MutexGuard, PoisonError};

use url::{form_urlencoded, Url};

use crate::{HttpResponse, Method, Transport, TransportError};

/// A request captured by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Path portion of the URL, without scheme, host or query
    pub fn path(&self) -> String {
        path_of(&self.url)
    }

    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let url = parse_url(&self.url)?;
        find_pair(url.query()?.as_bytes(), name)
    }

    /// Decoded value of a form-encoded body field
    pub fn form_field(&self, name: &str) -> Option<String> {
        find_pair(self.body.as_deref()?.as_bytes(), name)
    }
}

enum Reply {
    Response(HttpResponse),
    Failure(String),
}

struct Route {
    method: Method,
    prefix: String,
    reply: Reply,
}

/// Fake [`Transport`] with canned responses
///
/// Later registrations take precedence, so a test can replace a route after
/// a first round of calls. Unmatched requests receive a 404 with an empty body.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose path starts with `prefix`
    pub fn respond(&self, method: Method, prefix: &str, status: u16, body: impl Into<String>) {
        lock(&self.routes).push(Route {
            method,
            prefix: prefix.to_string(),
            reply: Reply::Response(HttpResponse::new(status, body)),
        });
    }

    /// Fail requests whose path starts with `prefix` with a network error
    pub fn fail(&self, method: Method, prefix: &str, message: &str) {
        lock(&self.routes).push(Route {
            method,
            prefix: prefix.to_string(),
            reply: Reply::Failure(message.to_string()),
        });
    }

    /// All requests seen so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests whose path starts with `prefix`
    pub fn request_count(&self, prefix: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.path().starts_with(prefix))
            .count()
    }

    /// Most recent request whose path starts with `prefix`
    pub fn last_request(&self, prefix: &str) -> Option<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .rev()
            .find(|r| r.path().starts_with(prefix))
            .cloned()
    }

    fn dispatch(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.map(str::to_string),
        });

        let path = path_of(url);
        let routes = lock(&self.routes);
        let route = routes
            .iter()
            .rev()
            .find(|r| r.method == method && path.starts_with(&r.prefix));

        match route {
            Some(Route {
                reply: Reply::Response(response),
                ..
            }) => Ok(response.clone()),
            Some(Route {
                reply: Reply::Failure(message),
                ..
            }) => Err(TransportError::Network(message.clone())),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        self.dispatch(Method::Get, url, headers, None)
    }

    fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.dispatch(Method::Post, url, headers, Some(body))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolve absolute URLs as-is and bare paths against a placeholder host
fn parse_url(raw: &str) -> Option<Url> {
    Url::parse("http://mock.invalid/").ok()?.join(raw).ok()
}

fn path_of(raw: &str) -> String {
    parse_url(raw).map_or_else(|| raw.to_string(), |url| url.path().to_string())
}

fn find_pair(encoded: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
