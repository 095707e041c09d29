//! Device handles
//!
//! A [`Chime`] or [`Doorbell`] wraps one validated [`DeviceRecord`] plus a
//! [`RingClient`](crate::RingClient) for on-demand calls. Shared accessors live
//! on the [`RingDevice`] trait; each returns `ApiError::FieldMissing` only when
//! the field is absent from the payload (`0` and `false` are real values).

mod chime;
mod doorbell;
mod record;

pub use chime::Chime;
pub use doorbell::{Doorbell, ExistingDoorbellType};
pub use record::{DeviceFamily, DeviceRecord, Owner};

use serde_json::{Map, Value};

use crate::{ApiError, Result};

fn missing(field: &str) -> ApiError {
    ApiError::FieldMissing(field.to_string())
}

/// Accessors shared by every device kind
///
/// Values are returned exactly as the API sent them, with no rounding or
/// unit conversion.
pub trait RingDevice {
    fn record(&self) -> &DeviceRecord;

    /// Speaker or ringer volume; the source setting differs per device kind
    fn volume(&self) -> Result<i64>;

    /// Vendor device id string (e.g. `"abcdef123"`)
    fn id(&self) -> Result<&str> {
        self.record()
            .device_id
            .as_deref()
            .ok_or_else(|| missing("device_id"))
    }

    /// Numeric id of the device record, used in per-device endpoint paths
    fn account_id(&self) -> u64 {
        self.record().account_id
    }

    /// Vendor device-type string, verbatim (e.g. `"chime"`, `"lpd_v1"`)
    fn kind(&self) -> &str {
        &self.record().kind
    }

    fn family(&self) -> DeviceFamily {
        self.record().family
    }

    /// User-assigned description, e.g. "Front Door"
    fn name(&self) -> Result<&str> {
        self.record()
            .description
            .as_deref()
            .ok_or_else(|| missing("description"))
    }

    fn address(&self) -> Result<&str> {
        self.record()
            .address
            .as_deref()
            .ok_or_else(|| missing("address"))
    }

    fn latitude(&self) -> Result<f64> {
        self.record().latitude.ok_or_else(|| missing("latitude"))
    }

    fn longitude(&self) -> Result<f64> {
        self.record().longitude.ok_or_else(|| missing("longitude"))
    }

    /// IANA time zone name of the install location
    fn timezone(&self) -> Result<&str> {
        self.record()
            .time_zone
            .as_deref()
            .ok_or_else(|| missing("time_zone"))
    }

    fn firmware(&self) -> Result<&str> {
        self.record()
            .firmware_version
            .as_deref()
            .ok_or_else(|| missing("firmware_version"))
    }

    /// Connectivity as last reported by the cloud, e.g. `"online"`
    fn connection_status(&self) -> Result<&str> {
        self.record()
            .alerts
            .as_ref()
            .ok_or_else(|| missing("alerts"))?
            .connection
            .as_deref()
            .ok_or_else(|| missing("alerts.connection"))
    }

    fn owner(&self) -> Result<&Owner> {
        self.record().owner.as_ref().ok_or_else(|| missing("owner"))
    }

    /// Owner account id, from the owner block or else the authenticated session
    fn owner_account_id(&self) -> Result<u64> {
        let record = self.record();
        record
            .owner
            .as_ref()
            .and_then(|o| o.account_id)
            .or(record.session_account_id)
            .ok_or_else(|| missing("owner.id"))
    }

    fn is_owned(&self) -> Result<bool> {
        self.record().owned.ok_or_else(|| missing("owned"))
    }

    /// Raw per-device feature map
    fn features(&self) -> Result<&Map<String, Value>> {
        self.record()
            .features
            .as_ref()
            .ok_or_else(|| missing("features"))
    }
}

/// A device of either kind
#[derive(Debug, Clone)]
pub enum DeviceHandle {
    Chime(Chime),
    Doorbell(Doorbell),
}

impl DeviceHandle {
    pub fn as_chime(&self) -> Option<&Chime> {
        match self {
            DeviceHandle::Chime(chime) => Some(chime),
            DeviceHandle::Doorbell(_) => None,
        }
    }

    pub fn as_doorbell(&self) -> Option<&Doorbell> {
        match self {
            DeviceHandle::Doorbell(doorbell) => Some(doorbell),
            DeviceHandle::Chime(_) => None,
        }
    }
}

impl RingDevice for DeviceHandle {
    fn record(&self) -> &DeviceRecord {
        match self {
            DeviceHandle::Chime(chime) => chime.record(),
            DeviceHandle::Doorbell(doorbell) => doorbell.record(),
        }
    }

    fn volume(&self) -> Result<i64> {
        match self {
            DeviceHandle::Chime(chime) => chime.volume(),
            DeviceHandle::Doorbell(doorbell) => doorbell.volume(),
        }
    }
}

impl From<Chime> for DeviceHandle {
    fn from(chime: Chime) -> Self {
        DeviceHandle::Chime(chime)
    }
}

impl From<Doorbell> for DeviceHandle {
    fn from(doorbell: Doorbell) -> Self {
        DeviceHandle::Doorbell(doorbell)
    }
}
