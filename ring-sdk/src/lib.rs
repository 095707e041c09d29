//! # Ring SDK
//!
//! Blocking access to Ring video doorbells and chimes through the vendor's
//! cloud API:
//!
//! ```rust,no_run
//! use ring_sdk::{Credentials, EventKind, Ring, RingDevice};
//!
//! fn main() -> Result<(), ring_sdk::SdkError> {
//!     ring_sdk::logging::init_logging_from_env()?;
//!
//!     let ring = Ring::connect(Credentials::new("foo@bar.org", "secret").persist_token(true))?;
//!
//!     for doorbell in ring.doorbells() {
//!         let motions = doorbell.history(5, Some(EventKind::Motion))?;
//!         println!("{}: {} recent motion events", doorbell.name()?, motions.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ring-sdk (Ring facade, logging)
//!     ↓
//! ring-api (session, device catalog, history)
//!     ↓
//! ring-transport (HTTP over ureq)
//! ```

pub use error::SdkError;
pub use ring::Ring;

// Re-export the types callers touch through the facade
pub use ring_api::{
    ApiConfig, ApiError, CatalogSnapshot, Chime, Credentials, DeviceCatalog, DeviceFamily,
    DeviceHandle, Doorbell, EventKind, ExistingDoorbellType, FeatureValue, Features,
    FileTokenStore, HistoryEvent, HistoryQuery, MemoryTokenStore, Owner, RingClient, RingDevice,
    Session, TokenStore,
};
pub use transport::{Transport, UreqTransport};
#[cfg(feature = "test-support")]
pub use transport::{Method, MockTransport};

mod error;
pub mod logging;
mod ring;
