//! Typed snapshot of one device object from the device listing

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ApiError, Result};

/// Which array of the device listing a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceFamily {
    #[default]
    Chimes,
    Doorbells,
    /// Doorbells shared with the account but owned by someone else
    SharedDoorbells,
}

impl DeviceFamily {
    /// Key of the JSON array this family is listed under
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceFamily::Chimes => "chimes",
            DeviceFamily::Doorbells => "doorbots",
            DeviceFamily::SharedDoorbells => "authorized_doorbots",
        }
    }
}

/// Owner block of a device
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Owner {
    #[serde(rename = "id", default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Alerts {
    #[serde(default)]
    pub(crate) connection: Option<String>,
}

/// One device as listed by the API
///
/// `id` and a non-empty `kind` are required and checked when the record is
/// built. Everything else is kept optional here and checked by the accessor
/// that reads it, so a record lacking `settings` still loads but its
/// `volume()` reports the missing field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "id")]
    pub(crate) account_id: u64,
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) device_id: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    #[serde(default)]
    pub(crate) time_zone: Option<String>,
    #[serde(default)]
    pub(crate) firmware_version: Option<String>,
    #[serde(default)]
    pub(crate) owned: Option<bool>,
    #[serde(default)]
    pub(crate) owner: Option<Owner>,
    #[serde(default)]
    pub(crate) alerts: Option<Alerts>,
    #[serde(default)]
    pub(crate) settings: Option<Map<String, Value>>,
    #[serde(default)]
    pub(crate) features: Option<Map<String, Value>>,
    #[serde(default)]
    pub(crate) battery_life: Option<Value>,
    #[serde(default)]
    pub(crate) subscribed: Option<bool>,
    #[serde(default)]
    pub(crate) subscribed_motions: Option<bool>,
    #[serde(skip)]
    pub(crate) family: DeviceFamily,
    #[serde(skip)]
    pub(crate) session_account_id: Option<u64>,
}

impl DeviceRecord {
    /// Build and validate a record from one element of a device array
    pub fn from_value(value: &Value, family: DeviceFamily) -> Result<Self> {
        let mut record = DeviceRecord::deserialize(value)
            .map_err(|e| ApiError::catalog(format!("invalid {} entry: {}", family.as_str(), e)))?;

        if record.kind.trim().is_empty() {
            return Err(ApiError::catalog(format!(
                "invalid {} entry {}: empty kind",
                family.as_str(),
                record.account_id
            )));
        }

        record.family = family;
        Ok(record)
    }

    /// Attach the authenticated account id used when the owner block is absent
    pub(crate) fn with_session_account(mut self, account_id: Option<u64>) -> Self {
        self.session_account_id = account_id;
        self
    }

    /// Value at `settings.<path>`; null counts as absent
    pub(crate) fn setting(&self, path: &[&str]) -> Result<&Value> {
        let missing = || ApiError::FieldMissing(format!("settings.{}", path.join(".")));

        let mut current = self
            .settings
            .as_ref()
            .ok_or_else(|| ApiError::FieldMissing("settings".to_string()))?;
        let (last, parents) = path.split_last().ok_or_else(missing)?;

        for key in parents {
            current = current
                .get(*key)
                .and_then(Value::as_object)
                .ok_or_else(missing)?;
        }

        current
            .get(*last)
            .filter(|v| !v.is_null())
            .ok_or_else(missing)
    }
}

/// Read an integer that some firmware reports as a numeric string
pub(crate) fn integer(value: &Value, field: &str) -> Result<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| ApiError::FieldMissing(format!("{} (not an integer)", field)))
}

pub(crate) fn boolean(value: &Value, field: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| ApiError::FieldMissing(format!("{} (not a boolean)", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_id_and_kind() {
        let missing_id = json!({"kind": "chime"});
        assert!(matches!(
            DeviceRecord::from_value(&missing_id, DeviceFamily::Chimes),
            Err(ApiError::Catalog { .. })
        ));

        let missing_kind = json!({"id": 1});
        assert!(DeviceRecord::from_value(&missing_kind, DeviceFamily::Chimes).is_err());

        let empty_kind = json!({"id": 1, "kind": "  "});
        assert!(DeviceRecord::from_value(&empty_kind, DeviceFamily::Chimes).is_err());
    }

    #[test]
    fn test_minimal_record_loads() {
        let value = json!({"id": 5, "kind": "chime"});
        let record = DeviceRecord::from_value(&value, DeviceFamily::Chimes).unwrap();
        assert_eq!(record.account_id, 5);
        assert_eq!(record.family, DeviceFamily::Chimes);
        assert!(record.settings.is_none());
    }

    #[test]
    fn test_setting_paths() {
        let record = DeviceRecord::from_value(
            &json!({
                "id": 5,
                "kind": "lpd_v1",
                "settings": {
                    "doorbell_volume": 0,
                    "motion_snooze": null,
                    "chime_settings": {"enable": true, "duration": 3}
                }
            }),
            DeviceFamily::Doorbells,
        )
        .unwrap();

        assert_eq!(record.setting(&["doorbell_volume"]).unwrap(), &json!(0));
        assert_eq!(record.setting(&["chime_settings", "duration"]).unwrap(), &json!(3));

        match record.setting(&["motion_snooze"]) {
            Err(ApiError::FieldMissing(path)) => assert_eq!(path, "settings.motion_snooze"),
            other => panic!("Expected FieldMissing, got {:?}", other),
        }
        match record.setting(&["chime_settings", "type"]) {
            Err(ApiError::FieldMissing(path)) => assert_eq!(path, "settings.chime_settings.type"),
            other => panic!("Expected FieldMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_setting_without_settings_block() {
        let value = json!({"id": 5, "kind": "chime"});
        let record = DeviceRecord::from_value(&value, DeviceFamily::Chimes).unwrap();
        match record.setting(&["volume"]) {
            Err(ApiError::FieldMissing(path)) => assert_eq!(path, "settings"),
            other => panic!("Expected FieldMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_accepts_numeric_strings() {
        assert_eq!(integer(&json!(4081), "battery_life").unwrap(), 4081);
        assert_eq!(integer(&json!("97"), "battery_life").unwrap(), 97);
        assert!(integer(&json!("full"), "battery_life").is_err());
    }
}
