use serde_json::Value;

use super::record::integer;
use super::{DeviceRecord, RingDevice};
use crate::{ApiError, Endpoint, EventKind, Result, RingClient};

/// Indoor accessory that plays alert tones for linked doorbells
#[derive(Debug, Clone)]
pub struct Chime {
    record: DeviceRecord,
    client: RingClient,
}

impl Chime {
    pub fn new(record: DeviceRecord, client: RingClient) -> Self {
        Self { record, client }
    }

    /// Doorbells wired to this chime, as the raw objects the API returns
    pub fn linked_doorbells(&self) -> Result<Vec<Value>> {
        let endpoint = Endpoint::ChimeLinkedDoorbells {
            id: self.record.account_id,
        };
        let response = self.client.get(endpoint, &[])?;
        if !response.is_success() {
            return Err(ApiError::Device(format!(
                "linked doorbells of chime {} returned HTTP {}",
                self.record.account_id, response.status
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            ApiError::Device(format!("malformed linked doorbells response: {}", e))
        })
    }

    /// Play the ding or motion tone once
    pub fn test_sound(&self, kind: EventKind) -> Result<()> {
        if !matches!(kind, EventKind::Ding | EventKind::Motion) {
            return Err(ApiError::Device(format!(
                "chimes can only play ding or motion tones, not {}",
                kind
            )));
        }

        let endpoint = Endpoint::ChimePlaySound {
            id: self.record.account_id,
        };
        let response = self.client.post_form(endpoint, &[("kind", kind.as_str())])?;
        if !response.is_success() {
            return Err(ApiError::Device(format!(
                "play sound on chime {} returned HTTP {}",
                self.record.account_id, response.status
            )));
        }

        tracing::debug!(chime = self.record.account_id, kind = %kind, "test sound played");
        Ok(())
    }
}

impl RingDevice for Chime {
    fn record(&self) -> &DeviceRecord {
        &self.record
    }

    fn volume(&self) -> Result<i64> {
        integer(self.record.setting(&["volume"])?, "settings.volume")
    }
}
