//! Typed client for the Ring doorbell cloud API
//!
//! This crate turns the vendor's JSON endpoints into typed values. It sits on
//! top of the `transport` crate, which does nothing but move bytes.
//!
//! # Flow
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ring_api::{ApiConfig, Credentials, DeviceCatalog, EventKind, RingDevice, SessionClient};
//! use transport::UreqTransport;
//!
//! let mut session = SessionClient::new(
//!     Arc::new(UreqTransport::new()),
//!     Arc::new(ApiConfig::from_env()?),
//!     Credentials::new("foo@bar.org", "secret"),
//! );
//! session.authenticate()?;
//!
//! let client = session.client()?;
//! let mut catalog = DeviceCatalog::new();
//! catalog.refresh(&client)?;
//!
//! for doorbell in catalog.doorbells() {
//!     let motions = doorbell.history(5, Some(EventKind::Motion))?;
//!     println!("{}: {} motion events", doorbell.name()?, motions.len());
//! }
//! ```
//!
//! Device accessors never guess: a field absent from the payload is an
//! [`ApiError::FieldMissing`], while `0` and `false` are returned as-is.

pub mod catalog;
pub mod client;
pub mod config;
pub mod device;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod session;
pub mod token_store;

pub use catalog::{CatalogSnapshot, DeviceCatalog};
pub use client::RingClient;
pub use config::ApiConfig;
pub use device::{
    Chime, DeviceFamily, DeviceHandle, DeviceRecord, Doorbell, ExistingDoorbellType, Owner,
    RingDevice,
};
pub use endpoint::Endpoint;
pub use error::{ApiError, Result};
pub use history::{EventKind, HistoryEvent, HistoryQuery};
pub use session::{Credentials, FeatureValue, Features, Session, SessionClient};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
