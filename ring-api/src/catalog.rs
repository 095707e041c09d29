//! Account device listing
//!
//! [`DeviceCatalog::refresh`] replaces the whole snapshot or nothing: a failed
//! refresh leaves the previous devices in place.

use serde_json::Value;

use crate::device::{Chime, DeviceFamily, DeviceHandle, DeviceRecord, Doorbell, RingDevice};
use crate::{ApiError, Endpoint, Result, RingClient};

/// Devices from one successful listing, in server order
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    chimes: Vec<Chime>,
    doorbells: Vec<Doorbell>,
    shared_doorbells: Vec<Doorbell>,
}

impl CatalogSnapshot {
    pub fn chimes(&self) -> &[Chime] {
        &self.chimes
    }

    /// Doorbells owned by the account
    pub fn doorbells(&self) -> &[Doorbell] {
        &self.doorbells
    }

    /// Doorbells other accounts have shared with this one
    pub fn shared_doorbells(&self) -> &[Doorbell] {
        &self.shared_doorbells
    }

    /// Every device: chimes, then owned doorbells, then shared doorbells
    pub fn devices(&self) -> impl Iterator<Item = &dyn RingDevice> {
        self.chimes
            .iter()
            .map(|c| c as &dyn RingDevice)
            .chain(self.doorbells.iter().map(|d| d as &dyn RingDevice))
            .chain(self.shared_doorbells.iter().map(|d| d as &dyn RingDevice))
    }

    /// Find a device by its vendor device id string
    pub fn device_by_id(&self, device_id: &str) -> Option<DeviceHandle> {
        let matches = |device: &dyn RingDevice| device.id().map_or(false, |id| id == device_id);

        if let Some(chime) = self.chimes.iter().find(|c| matches(*c)) {
            return Some(DeviceHandle::Chime(chime.clone()));
        }
        self.doorbells
            .iter()
            .chain(self.shared_doorbells.iter())
            .find(|d| matches(*d))
            .map(|d| DeviceHandle::Doorbell(d.clone()))
    }

    pub fn len(&self) -> usize {
        self.chimes.len() + self.doorbells.len() + self.shared_doorbells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse(body: &str, client: &RingClient) -> Result<Self> {
        let listing: Value = serde_json::from_str(body)
            .map_err(|e| ApiError::catalog(format!("malformed device listing: {}", e)))?;
        let listing = listing
            .as_object()
            .ok_or_else(|| ApiError::catalog("device listing is not a JSON object"))?;

        let records = |family: DeviceFamily, required: bool| -> Result<Vec<DeviceRecord>> {
            let entries = match listing.get(family.as_str()) {
                Some(Value::Array(entries)) => entries,
                None | Some(Value::Null) if !required => return Ok(Vec::new()),
                Some(_) => {
                    return Err(ApiError::catalog(format!(
                        "'{}' is not an array",
                        family.as_str()
                    )))
                }
                None => {
                    return Err(ApiError::catalog(format!(
                        "device listing has no '{}' array",
                        family.as_str()
                    )))
                }
            };
            entries
                .iter()
                .map(|entry| {
                    DeviceRecord::from_value(entry, family)
                        .map(|record| record.with_session_account(client.account_id()))
                })
                .collect()
        };

        let chimes = records(DeviceFamily::Chimes, true)?
            .into_iter()
            .map(|record| Chime::new(record, client.clone()))
            .collect();
        let doorbells = records(DeviceFamily::Doorbells, true)?
            .into_iter()
            .map(|record| Doorbell::new(record, client.clone()))
            .collect();
        let shared_doorbells = records(DeviceFamily::SharedDoorbells, false)?
            .into_iter()
            .map(|record| Doorbell::new(record, client.clone()))
            .collect();

        Ok(Self {
            chimes,
            doorbells,
            shared_doorbells,
        })
    }
}

/// Cached device listing for one account
#[derive(Debug, Default)]
pub struct DeviceCatalog {
    snapshot: Option<CatalogSnapshot>,
}

impl DeviceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the device listing and replace the snapshot
    ///
    /// On any error the previous snapshot is kept untouched.
    pub fn refresh(&mut self, client: &RingClient) -> Result<&CatalogSnapshot> {
        let response = client.get(Endpoint::RingDevices, &[])?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "device listing rejected");
            return Err(ApiError::catalog_status(response.status));
        }

        let snapshot = CatalogSnapshot::parse(&response.body, client)?;
        tracing::info!(
            chimes = snapshot.chimes.len(),
            doorbells = snapshot.doorbells.len(),
            shared_doorbells = snapshot.shared_doorbells.len(),
            "device catalog refreshed"
        );

        Ok(&*self.snapshot.insert(snapshot))
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.snapshot.as_ref()
    }

    /// Drop the snapshot
    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn chimes(&self) -> &[Chime] {
        self.snapshot
            .as_ref()
            .map(CatalogSnapshot::chimes)
            .unwrap_or(&[])
    }

    pub fn doorbells(&self) -> &[Doorbell] {
        self.snapshot
            .as_ref()
            .map(CatalogSnapshot::doorbells)
            .unwrap_or(&[])
    }

    pub fn shared_doorbells(&self) -> &[Doorbell] {
        self.snapshot
            .as_ref()
            .map(CatalogSnapshot::shared_doorbells)
            .unwrap_or(&[])
    }

    /// Every loaded device; empty before the first refresh
    pub fn devices(&self) -> impl Iterator<Item = &dyn RingDevice> {
        self.snapshot.iter().flat_map(CatalogSnapshot::devices)
    }

    pub fn device_by_id(&self, device_id: &str) -> Option<DeviceHandle> {
        self.snapshot.as_ref()?.device_by_id(device_id)
    }
}
