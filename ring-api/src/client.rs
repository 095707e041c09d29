use std::fmt;
use std::sync::Arc;

use transport::{HttpResponse, Transport};
use url::Url;

use crate::{ApiConfig, Endpoint, Result};

/// Token-bearing view of the transport
///
/// Every request goes to `base_url + endpoint path`, carries `api_version`,
/// the configured user agent and `Authorization: Bearer <token>`. Device
/// handles keep a clone so they can issue on-demand calls; clones share the
/// transport and config through `Arc`.
#[derive(Clone)]
pub struct RingClient {
    transport: Arc<dyn Transport>,
    config: Arc<ApiConfig>,
    token: Arc<str>,
    account_id: Option<u64>,
}

impl RingClient {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<ApiConfig>, token: &str) -> Self {
        Self {
            transport,
            config,
            token: Arc::from(token),
            account_id: None,
        }
    }

    /// Record the account the token belongs to
    pub fn with_account_id(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Account id of the session this client was issued for, if known
    pub fn account_id(&self) -> Option<u64> {
        self.account_id
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The bearer token attached to requests
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send an authorized GET and return the raw response
    pub fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<HttpResponse> {
        let url = self.url(endpoint, query)?;
        let authorization = format!("Bearer {}", self.token);
        let headers = [
            ("Authorization", authorization.as_str()),
            ("User-Agent", self.config.user_agent.as_str()),
            ("Accept", "application/json"),
        ];

        let response = self.transport.get(url.as_str(), &headers)?;
        tracing::debug!(
            endpoint = endpoint.name(),
            method = "GET",
            status = response.status,
            "authorized request"
        );
        Ok(response)
    }

    /// Send an authorized form-encoded POST and return the raw response
    pub fn post_form(&self, endpoint: Endpoint, form: &[(&str, &str)]) -> Result<HttpResponse> {
        let url = self.url(endpoint, &[])?;
        let authorization = format!("Bearer {}", self.token);
        let headers = [
            ("Authorization", authorization.as_str()),
            ("User-Agent", self.config.user_agent.as_str()),
            ("Content-Type", "application/x-www-form-urlencoded"),
        ];
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form.iter())
            .finish();

        let response = self.transport.post(url.as_str(), &headers, &body)?;
        tracing::debug!(
            endpoint = endpoint.name(),
            method = "POST",
            status = response.status,
            "authorized request"
        );
        Ok(response)
    }

    fn url(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.config.endpoint_url(&endpoint.path())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_version", &self.config.api_version.to_string());
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

impl fmt::Debug for RingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("account_id", &self.account_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
