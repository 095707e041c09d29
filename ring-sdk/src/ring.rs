//! Ring - main entry point for the SDK
//!
//! Ties the session and the device catalog together behind one blocking API.

use std::sync::Arc;

use ring_api::{
    ApiConfig, Chime, Credentials, DeviceCatalog, DeviceHandle, Doorbell, FileTokenStore,
    Features, RingClient, RingDevice, Session, SessionClient, TokenStore,
};
use transport::{Transport, UreqTransport};

use crate::SdkError;

/// A logged-in account and its devices
///
/// Construction logs in and loads the device list, so a `Ring` value is
/// always connected unless [`disconnect`](Self::disconnect) was called.
///
/// # Example
///
/// ```rust,ignore
/// use ring_sdk::{Credentials, Ring, RingDevice};
///
/// fn main() -> Result<(), ring_sdk::SdkError> {
///     let ring = Ring::connect(Credentials::new("foo@bar.org", "secret"))?;
///
///     for chime in ring.chimes() {
///         println!("{} volume {}", chime.name()?, chime.volume()?);
///     }
///
///     let front = ring.get_device("aacdef123")?;
///     println!("front door is {}", front.connection_status()?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Ring {
    session: SessionClient,
    catalog: DeviceCatalog,
}

impl Ring {
    /// Connect to the production API
    ///
    /// Configuration comes from the `RING_API_*` environment variables. When
    /// the credentials ask for token persistence the session is cached in the
    /// user cache directory.
    pub fn connect(credentials: Credentials) -> Result<Self, SdkError> {
        let config = ApiConfig::from_env()?;
        let token_store = if credentials.persists_token() {
            Some(Arc::new(FileTokenStore::default_location()?) as Arc<dyn TokenStore>)
        } else {
            None
        };

        Self::connect_with(
            Arc::new(UreqTransport::new()),
            config,
            credentials,
            token_store,
        )
    }

    /// Connect with an explicit transport, config and token store
    ///
    /// A cached session is tried first. If the device listing rejects it
    /// with 401 the client logs in once more and retries; any other failure
    /// is returned as-is.
    pub fn connect_with(
        transport: Arc<dyn Transport>,
        config: ApiConfig,
        credentials: Credentials,
        token_store: Option<Arc<dyn TokenStore>>,
    ) -> Result<Self, SdkError> {
        let mut session = SessionClient::new(transport, Arc::new(config), credentials);
        if let Some(store) = token_store {
            session = session.with_token_store(store);
        }

        let mut ring = Self {
            session,
            catalog: DeviceCatalog::new(),
        };
        ring.establish()?;
        Ok(ring)
    }

    fn establish(&mut self) -> Result<(), SdkError> {
        let resumed = match self.session.resume() {
            Ok(resumed) => resumed.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read cached session");
                false
            }
        };

        if resumed {
            match self.update() {
                Ok(()) => return Ok(()),
                Err(SdkError::Api(e)) if e.is_unauthorized() => {
                    tracing::info!("cached session rejected, logging in again");
                }
                Err(e) => return Err(e),
            }
        }

        self.session.authenticate()?;
        self.update()
    }

    /// Reload the device list
    ///
    /// On failure the previously loaded devices stay available.
    pub fn update(&mut self) -> Result<(), SdkError> {
        let client = self.session.client()?;
        self.catalog.refresh(&client)?;
        Ok(())
    }

    /// Drop the session and the loaded devices
    pub fn disconnect(&mut self) {
        self.session.disconnect();
        self.catalog.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Account feature flags from the login response
    pub fn features(&self) -> Option<&Features> {
        self.session.features()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn persist_token(&self) -> bool {
        self.session.persist_token()
    }

    /// Token-bearing client for calls the facade does not wrap
    pub fn client(&self) -> Result<RingClient, SdkError> {
        Ok(self.session.client()?)
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn chimes(&self) -> &[Chime] {
        self.catalog.chimes()
    }

    pub fn doorbells(&self) -> &[Doorbell] {
        self.catalog.doorbells()
    }

    pub fn shared_doorbells(&self) -> &[Doorbell] {
        self.catalog.shared_doorbells()
    }

    pub fn devices(&self) -> impl Iterator<Item = &dyn RingDevice> {
        self.catalog.devices()
    }

    pub fn device_by_id(&self, device_id: &str) -> Option<DeviceHandle> {
        self.catalog.device_by_id(device_id)
    }

    /// Like [`device_by_id`](Self::device_by_id), but a miss is an error
    pub fn get_device(&self, device_id: &str) -> Result<DeviceHandle, SdkError> {
        self.device_by_id(device_id)
            .ok_or_else(|| SdkError::DeviceNotFound(device_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring_api::{ApiError, MemoryTokenStore};
    use transport::{Method, MockTransport};

    const PROFILE: &str = r#"{"profile": {
        "authentication_token": "fresh-token", "email": "foo@bar.org", "id": 5,
        "features": {"vod_enabled": true}
    }}"#;

    const DEVICES: &str = r#"{
        "chimes": [{"id": 10, "device_id": "chime1", "kind": "chime", "settings": {"volume": 4}}],
        "doorbots": [{"id": 20, "device_id": "bell1", "kind": "lpd_v1"}]
    }"#;

    fn cached_session(token: &str) -> Session {
        Session {
            authentication_token: token.to_string(),
            username: Some("foo@bar.org".to_string()),
            account_email: "foo@bar.org".to_string(),
            account_id: 5,
            first_name: None,
            last_name: None,
            features: Features::new(),
        }
    }

    fn connect(
        transport: &Arc<MockTransport>,
        credentials: Credentials,
        store: Option<Arc<MemoryTokenStore>>,
    ) -> Result<Ring, SdkError> {
        Ring::connect_with(
            Arc::clone(transport) as Arc<dyn Transport>,
            ApiConfig::new(),
            credentials,
            store.map(|s| s as Arc<dyn TokenStore>),
        )
    }

    #[test]
    fn test_connect_logs_in_and_loads_devices() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 201, PROFILE);
        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);

        let ring = connect(&transport, Credentials::new("foo@bar.org", "bar"), None).unwrap();
        assert!(ring.is_connected());
        assert!(!ring.persist_token());
        assert_eq!(ring.chimes().len(), 1);
        assert_eq!(ring.doorbells().len(), 1);
        assert_eq!(ring.devices().count(), 2);
        assert_eq!(ring.features().unwrap().len(), 1);
    }

    #[test]
    fn test_rejected_login_fails_connect() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 401, "");

        let err = connect(&transport, Credentials::new("foo@bar.org", "bad"), None).unwrap_err();
        assert!(matches!(err, SdkError::Api(ApiError::Auth(_))));
        assert!(err.is_auth_error());
        assert_eq!(transport.request_count("/clients_api/ring_devices"), 0);
    }

    #[test]
    fn test_cached_session_skips_login() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);
        let store = Arc::new(MemoryTokenStore::new());
        store.save(&cached_session("cached-token")).unwrap();

        let credentials = Credentials::new("foo@bar.org", "bar").persist_token(true);
        let ring = connect(&transport, credentials, Some(store)).unwrap();

        assert!(ring.persist_token());
        assert_eq!(transport.request_count("/clients_api/session"), 0);
        let request = transport.last_request("/clients_api/ring_devices").unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer cached-token"));
    }

    #[test]
    fn test_stale_cached_session_logs_in_once() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 201, PROFILE);
        transport.respond(Method::Get, "/clients_api/ring_devices", 401, "");
        let store = Arc::new(MemoryTokenStore::new());
        store.save(&cached_session("expired-token")).unwrap();

        let credentials = Credentials::new("foo@bar.org", "bar").persist_token(true);
        // Still 401 after the fresh login: the error surfaces, no loop
        let err = connect(&transport, credentials.clone(), Some(Arc::clone(&store))).unwrap_err();
        assert!(matches!(&err, SdkError::Api(e) if e.is_unauthorized()));
        assert_eq!(transport.request_count("/clients_api/session"), 1);
        assert_eq!(transport.request_count("/clients_api/ring_devices"), 2);

        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);
        store.save(&cached_session("expired-token")).unwrap();
        let ring = connect(&transport, credentials, Some(store)).unwrap();
        assert_eq!(ring.session().unwrap().authentication_token, "expired-token");
    }

    #[test]
    fn test_get_device() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 201, PROFILE);
        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);

        let ring = connect(&transport, Credentials::new("foo@bar.org", "bar"), None).unwrap();
        assert_eq!(ring.get_device("bell1").unwrap().account_id(), 20);
        assert!(matches!(
            ring.get_device("nope"),
            Err(SdkError::DeviceNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_failed_update_keeps_devices() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 201, PROFILE);
        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);

        let mut ring = connect(&transport, Credentials::new("foo@bar.org", "bar"), None).unwrap();
        transport.respond(Method::Get, "/clients_api/ring_devices", 500, "");

        assert!(ring.update().is_err());
        assert_eq!(ring.chimes()[0].volume().unwrap(), 4);
    }

    #[test]
    fn test_disconnect() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, "/clients_api/session", 201, PROFILE);
        transport.respond(Method::Get, "/clients_api/ring_devices", 200, DEVICES);

        let mut ring = connect(&transport, Credentials::new("foo@bar.org", "bar"), None).unwrap();
        ring.disconnect();

        assert!(!ring.is_connected());
        assert!(ring.chimes().is_empty());
        assert!(matches!(
            ring.update(),
            Err(SdkError::Api(ApiError::NotConnected))
        ));
    }
}
