//! Client configuration
//!
//! Values the vendor API expects on every request, plus the base URL so tests
//! and staging setups can point the client somewhere else.

use url::Url;

use crate::error::{ApiError, Result};

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.ring.com/";

/// API version sent with every request
pub const DEFAULT_API_VERSION: u32 = 9;

/// User agent of the Android app the API was reverse engineered from
pub const DEFAULT_USER_AGENT: &str = "android:com.ringapp:2.0.67(423)";

/// Configuration shared by the session client and every authorized request
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Root URL the endpoint paths are resolved against
    /// Default: https://api.ring.com/
    pub base_url: Url,

    /// Value of the `api_version` parameter
    /// Default: 9
    pub api_version: u32,

    /// Identifier this client registers as during login
    /// Default: a random v4 UUID per config
    pub hardware_id: String,

    /// `User-Agent` header value
    pub user_agent: String,

    /// `device[os]` sent during login
    pub device_os: String,

    /// `device[app_brand]` sent during login
    pub app_brand: String,

    /// `device[metadata][device_model]` sent during login
    pub device_model: String,

    /// `device[metadata][language]` sent during login
    pub language: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: DEFAULT_API_VERSION,
            hardware_id: uuid::Uuid::new_v4().to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            device_os: "android".to_string(),
            app_brand: "ring".to_string(),
            device_model: "KVM".to_string(),
            language: "en".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_hardware_id(mut self, hardware_id: impl Into<String>) -> Self {
        self.hardware_id = hardware_id.into();
        self
    }

    /// Build a config from the process environment
    ///
    /// Recognized variables:
    /// - `RING_API_BASE_URL`: API root override
    /// - `RING_API_VERSION`: numeric API version
    /// - `RING_HARDWARE_ID`: stable hardware identifier
    /// - `RING_USER_AGENT`: user agent override
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = non_empty(&lookup, "RING_API_BASE_URL") {
            config.base_url = parse_base_url(&base_url)?;
        }
        if let Some(version) = non_empty(&lookup, "RING_API_VERSION") {
            config.api_version = version.parse().map_err(|_| {
                ApiError::Config("RING_API_VERSION must be a valid number".to_string())
            })?;
        }
        if let Some(hardware_id) = non_empty(&lookup, "RING_HARDWARE_ID") {
            config.hardware_id = hardware_id;
        }
        if let Some(user_agent) = non_empty(&lookup, "RING_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // A trailing slash keeps `join` from replacing the last path segment
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized)
        .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::Config(format!(
            "base URL must use http or https, got '{}'",
            other
        ))),
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base URL is valid"))
}
