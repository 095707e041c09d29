//! Authentication against the session endpoint
//!
//! [`SessionClient`] owns the credentials, performs the login handshake and
//! hands out [`RingClient`]s that carry the resulting bearer token.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use transport::Transport;

use crate::{ApiConfig, ApiError, Endpoint, Result, RingClient, TokenStore};

/// Login credentials
///
/// Fixed once handed to a [`SessionClient`]; there are no setters.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    persist_token: bool,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            persist_token: false,
        }
    }

    /// Cache the session token through a [`TokenStore`] for reuse across restarts
    pub fn persist_token(mut self, persist: bool) -> Self {
        self.persist_token = persist;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn persists_token(&self) -> bool {
        self.persist_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("persist_token", &self.persist_token)
            .finish()
    }
}

/// Value of one account feature flag
///
/// Most flags are booleans; a few (log levels) are integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Level(i64),
    Other(serde_json::Value),
}

impl FeatureValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FeatureValue::Level(value) => Some(*value),
            _ => None,
        }
    }
}

/// Account feature flags, keyed exactly as the server sent them
pub type Features = BTreeMap<String, FeatureValue>;

/// An authenticated context: bearer token plus the account it belongs to
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub authentication_token: String,
    /// Login name the session was issued for; may differ from the email
    #[serde(default)]
    pub username: Option<String>,
    pub account_email: String,
    pub account_id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub features: Features,
}

impl Session {
    /// True if the flag exists and is a boolean `true`
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features
            .get(name)
            .and_then(FeatureValue::as_bool)
            .unwrap_or(false)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authentication_token", &"<redacted>")
            .field("username", &self.username)
            .field("account_email", &self.account_email)
            .field("account_id", &self.account_id)
            .field("features", &self.features.len())
            .finish()
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    profile: Profile,
}

#[derive(Deserialize)]
struct Profile {
    authentication_token: String,
    email: String,
    id: u64,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    features: Features,
}

impl From<Profile> for Session {
    fn from(profile: Profile) -> Self {
        Self {
            authentication_token: profile.authentication_token,
            username: None,
            account_email: profile.email,
            account_id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            features: profile.features,
        }
    }
}

/// Performs the login handshake and holds the resulting session
///
/// One session per client. Each [`authenticate`](Self::authenticate) call is
/// exactly one network request; retrying is up to the caller.
pub struct SessionClient {
    transport: Arc<dyn Transport>,
    config: Arc<ApiConfig>,
    credentials: Credentials,
    token_store: Option<Arc<dyn TokenStore>>,
    session: Option<Session>,
}

impl SessionClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: Arc<ApiConfig>,
        credentials: Credentials,
    ) -> Self {
        Self {
            transport,
            config,
            credentials,
            token_store: None,
            session: None,
        }
    }

    /// Attach the store used when the credentials ask for token persistence
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Log in and store the session
    ///
    /// Any failure leaves the client disconnected. When `persist_token` is set
    /// and a store is attached, the new session is saved; a failed save is
    /// logged and does not fail the login.
    pub fn authenticate(&mut self) -> Result<&Session> {
        self.session = None;

        let url = self.config.endpoint_url(&Endpoint::Session.path())?;
        let api_version = self.config.api_version.to_string();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &self.credentials.username)
            .append_pair("password", &self.credentials.password)
            .append_pair("api_version", &api_version)
            .append_pair("device[os]", &self.config.device_os)
            .append_pair("device[hardware_id]", &self.config.hardware_id)
            .append_pair("device[app_brand]", &self.config.app_brand)
            .append_pair("device[metadata][device_model]", &self.config.device_model)
            .append_pair("device[metadata][language]", &self.config.language)
            .finish();
        let headers = [
            ("User-Agent", self.config.user_agent.as_str()),
            ("Content-Type", "application/x-www-form-urlencoded"),
            ("Accept", "application/json"),
        ];

        let response = self.transport.post(url.as_str(), &headers, &body)?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "session request rejected");
            return Err(ApiError::Auth(format!(
                "session endpoint returned HTTP {}",
                response.status
            )));
        }

        let parsed: SessionResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Auth(format!("malformed session response: {}", e)))?;
        let mut session = Session::from(parsed.profile);
        session.username = Some(self.credentials.username.clone());

        if session.authentication_token.is_empty() {
            return Err(ApiError::Auth("session response carried an empty token".to_string()));
        }

        if self.credentials.persist_token {
            if let Some(store) = &self.token_store {
                if let Err(e) = store.save(&session) {
                    tracing::warn!(error = %e, "failed to persist session token");
                }
            }
        }

        tracing::info!(
            account_id = session.account_id,
            features = session.features.len(),
            "authenticated"
        );

        Ok(&*self.session.insert(session))
    }

    /// Install a previously persisted session without a network call
    ///
    /// Returns `None` when persistence is off, no store is attached, nothing
    /// is cached, or the cached session was issued for another login name.
    pub fn resume(&mut self) -> Result<Option<&Session>> {
        if !self.credentials.persist_token {
            return Ok(None);
        }
        let Some(store) = &self.token_store else {
            return Ok(None);
        };
        let Some(session) = store.load()? else {
            return Ok(None);
        };

        // Caches written before the username was recorded only carry the email
        let owner = session.username.as_deref().unwrap_or(&session.account_email);
        if !owner.eq_ignore_ascii_case(&self.credentials.username) {
            tracing::debug!("cached session was issued for a different login, ignoring");
            return Ok(None);
        }

        tracing::info!(account_id = session.account_id, "resumed cached session");
        Ok(Some(&*self.session.insert(session)))
    }

    /// Drop the held session; the cached copy (if any) is left alone
    pub fn disconnect(&mut self) {
        self.session = None;
    }

    /// True iff a session is held
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Feature flags of the held session
    pub fn features(&self) -> Option<&Features> {
        self.session.as_ref().map(|s| &s.features)
    }

    pub fn persist_token(&self) -> bool {
        self.credentials.persist_token
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &Arc<ApiConfig> {
        &self.config
    }

    /// Token-bearing client for authorized calls
    pub fn client(&self) -> Result<RingClient> {
        let session = self.session.as_ref().ok_or(ApiError::NotConnected)?;
        Ok(RingClient::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.config),
            &session.authentication_token,
        )
        .with_account_id(session.account_id))
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("credentials", &self.credentials)
            .field("connected", &self.is_connected())
            .finish()
    }
}
