use std::fmt;

use super::record::{boolean, integer};
use super::{DeviceRecord, RingDevice};
use crate::{ApiError, EventKind, HistoryEvent, HistoryQuery, Result, RingClient};

/// Kind of in-home chime a doorbell is wired to, derived from its kind string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExistingDoorbellType {
    Mechanical,
    Digital,
    Unknown,
}

const DOORBELL_TYPES: &[(&str, ExistingDoorbellType)] = &[
    ("lpd_v1", ExistingDoorbellType::Mechanical),
    ("lpd_v2", ExistingDoorbellType::Mechanical),
    ("lpd_v3", ExistingDoorbellType::Mechanical),
    ("jbox_v1", ExistingDoorbellType::Mechanical),
    ("doorbot", ExistingDoorbellType::Digital),
    ("doorbell", ExistingDoorbellType::Digital),
    ("doorbell_v3", ExistingDoorbellType::Digital),
    ("doorbell_v4", ExistingDoorbellType::Digital),
    ("doorbell_v5", ExistingDoorbellType::Digital),
];

impl ExistingDoorbellType {
    /// Look up a kind string; kinds missing from the table map to `Unknown`
    pub fn from_kind(kind: &str) -> Self {
        DOORBELL_TYPES
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(ExistingDoorbellType::Unknown, |(_, t)| *t)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExistingDoorbellType::Mechanical => "Mechanical",
            ExistingDoorbellType::Digital => "Digital",
            ExistingDoorbellType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ExistingDoorbellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Camera doorbell with motion and ding history
#[derive(Debug, Clone)]
pub struct Doorbell {
    record: DeviceRecord,
    client: RingClient,
}

impl Doorbell {
    pub fn new(record: DeviceRecord, client: RingClient) -> Self {
        Self { record, client }
    }

    /// Type of the existing chime this doorbell drives
    pub fn existing_doorbell_type(&self) -> ExistingDoorbellType {
        ExistingDoorbellType::from_kind(&self.record.kind)
    }

    /// Whether the doorbell rings the existing in-home chime
    pub fn existing_doorbell_type_enabled(&self) -> Result<bool> {
        boolean(
            self.record.setting(&["chime_settings", "enable"])?,
            "settings.chime_settings.enable",
        )
    }

    /// How long the existing chime rings, in seconds
    pub fn existing_doorbell_type_duration(&self) -> Result<i64> {
        integer(
            self.record.setting(&["chime_settings", "duration"])?,
            "settings.chime_settings.duration",
        )
    }

    /// Battery level as reported by the device
    pub fn battery_life(&self) -> Result<i64> {
        let value = self
            .record
            .battery_life
            .as_ref()
            .filter(|v| !v.is_null())
            .ok_or_else(|| ApiError::FieldMissing("battery_life".to_string()))?;
        integer(value, "battery_life")
    }

    /// Whether the account has a recording plan for this doorbell
    pub fn is_subscribed(&self) -> Result<bool> {
        self.record
            .subscribed
            .ok_or_else(|| ApiError::FieldMissing("subscribed".to_string()))
    }

    pub fn is_subscribed_motions(&self) -> Result<bool> {
        self.record
            .subscribed_motions
            .ok_or_else(|| ApiError::FieldMissing("subscribed_motions".to_string()))
    }

    /// Up to `limit` recent events, optionally only of one kind
    pub fn history(&self, limit: u32, kind: Option<EventKind>) -> Result<Vec<HistoryEvent>> {
        let mut query = HistoryQuery::new(limit);
        if let Some(kind) = kind {
            query = query.kind(kind);
        }
        self.run_history(&query)
    }

    /// Run an arbitrary history query against this doorbell
    pub fn run_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEvent>> {
        query.execute(&self.client, self.record.account_id)
    }

    /// Id of the most recent event, if any
    pub fn last_recording_id(&self) -> Result<Option<u64>> {
        Ok(self.history(1, None)?.first().map(|event| event.id))
    }
}

impl RingDevice for Doorbell {
    fn record(&self) -> &DeviceRecord {
        &self.record
    }

    fn volume(&self) -> Result<i64> {
        integer(
            self.record.setting(&["doorbell_volume"])?,
            "settings.doorbell_volume",
        )
    }
}
