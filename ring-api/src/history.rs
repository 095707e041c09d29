//! Doorbell event history
//!
//! One query is one GET against the doorbell's history endpoint. Results are
//! never cached; calling twice fetches twice.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ApiError, Endpoint, Result, RingClient};

/// What triggered a recorded event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Motion,
    Ding,
    OnDemand,
    /// Any kind this crate does not know about yet
    #[serde(other)]
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Motion => "motion",
            EventKind::Ding => "ding",
            EventKind::OnDemand => "on_demand",
            EventKind::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "motion" => Ok(EventKind::Motion),
            "ding" => Ok(EventKind::Ding),
            "on_demand" => Ok(EventKind::OnDemand),
            other => Err(ApiError::History(format!("unknown event kind '{}'", other))),
        }
    }
}

/// A recorded motion, ding or live-view occurrence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEvent {
    pub id: u64,
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
    pub answered: bool,
    /// Recording state, e.g. `"ready"`; empty when the event has no recording block
    pub recording_status: String,
    pub snapshot_url: String,
    pub favorite: bool,
}

#[derive(Deserialize)]
struct RawEvent {
    id: u64,
    kind: EventKind,
    created_at: DateTime<Utc>,
    #[serde(default)]
    answered: Option<bool>,
    #[serde(default)]
    recording: Option<RawRecording>,
    #[serde(default)]
    snapshot_url: Option<String>,
    #[serde(default)]
    favorite: Option<bool>,
}

#[derive(Deserialize)]
struct RawRecording {
    #[serde(default)]
    status: Option<String>,
}

impl From<RawEvent> for HistoryEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            id: raw.id,
            kind: raw.kind,
            created_at: raw.created_at,
            answered: raw.answered.unwrap_or(false),
            recording_status: raw
                .recording
                .and_then(|r| r.status)
                .unwrap_or_default(),
            snapshot_url: raw.snapshot_url.unwrap_or_default(),
            favorite: raw.favorite.unwrap_or(false),
        }
    }
}

/// Filtered single-page history request
///
/// ```rust,ignore
/// let motions = HistoryQuery::new(10)
///     .kind(EventKind::Motion)
///     .execute(&client, doorbell.account_id())?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    limit: u32,
    kind: Option<EventKind>,
    older_than: Option<u64>,
}

impl HistoryQuery {
    /// Return at most `limit` events
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            kind: None,
            older_than: None,
        }
    }

    /// Only return events of this kind
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Only return events older than the given event id
    pub fn older_than(mut self, event_id: u64) -> Self {
        self.older_than = Some(event_id);
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Run the query against one doorbell
    ///
    /// The kind filter is sent to the server and enforced again on the
    /// returned page, which is then cut to `limit`. No matching events is an
    /// empty list, not an error.
    pub fn execute(&self, client: &RingClient, doorbell_id: u64) -> Result<Vec<HistoryEvent>> {
        if self.limit == 0 {
            return Err(ApiError::History("limit must be at least 1".to_string()));
        }

        let mut query = vec![("limit", self.limit.to_string())];
        if let Some(kind) = self.kind {
            query.push(("kind", kind.as_str().to_string()));
        }
        if let Some(older_than) = self.older_than {
            query.push(("older_than", older_than.to_string()));
        }

        let response = client.get(Endpoint::DoorbellHistory { id: doorbell_id }, &query)?;
        if !response.is_success() {
            tracing::warn!(
                doorbell = doorbell_id,
                status = response.status,
                "history request rejected"
            );
            return Err(ApiError::History(format!(
                "history of doorbell {} returned HTTP {}",
                doorbell_id, response.status
            )));
        }

        let raw: Vec<RawEvent> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::History(format!("malformed history response: {}", e)))?;

        let events: Vec<HistoryEvent> = raw
            .into_iter()
            .map(HistoryEvent::from)
            .filter(|event| self.kind.map_or(true, |kind| event.kind == kind))
            .take(self.limit as usize)
            .collect();

        tracing::debug!(doorbell = doorbell_id, events = events.len(), "history fetched");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiConfig;
    use std::sync::Arc;
    use transport::{Method, MockTransport};

    const PAGE: &str = r#"[
        {"id": 3, "kind": "ding", "created_at": "2017-03-05T15:05:00.000Z", "answered": true,
         "recording": {"status": "ready"}, "snapshot_url": "", "favorite": true},
        {"id": 2, "kind": "motion", "created_at": "2017-03-05T15:04:00.000Z", "answered": false,
         "recording": {"status": "ready"}, "snapshot_url": ""},
        {"id": 1, "kind": "on_demand", "created_at": "2017-03-05T15:03:00.000Z", "answered": false}
    ]"#;

    fn client(transport: &Arc<MockTransport>) -> RingClient {
        RingClient::new(
            Arc::clone(transport) as Arc<dyn transport::Transport>,
            Arc::new(ApiConfig::new()),
            "token",
        )
    }

    #[test]
    fn test_event_kind_parsing() {
        assert_eq!("ding".parse::<EventKind>().unwrap(), EventKind::Ding);
        assert!("ring".parse::<EventKind>().is_err());

        let kind: EventKind = serde_json::from_str(r#""stream_start""#).unwrap();
        assert_eq!(kind, EventKind::Other);
    }

    #[test]
    fn test_query_parameters() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 200, "[]");

        HistoryQuery::new(5)
            .kind(EventKind::Ding)
            .older_than(1000)
            .execute(&client(&transport), 42)
            .unwrap();

        let request = transport.last_request("/clients_api/doorbots/42/history").unwrap();
        assert_eq!(request.query_param("limit").as_deref(), Some("5"));
        assert_eq!(request.query_param("kind").as_deref(), Some("ding"));
        assert_eq!(request.query_param("older_than").as_deref(), Some("1000"));
    }

    #[test]
    fn test_normalizes_events() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 200, PAGE);

        let events = HistoryQuery::new(10).execute(&client(&transport), 42).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, 3);
        assert!(events[0].answered);
        assert!(events[0].favorite);
        assert_eq!(events[0].recording_status, "ready");
        assert_eq!(events[0].created_at.to_rfc3339(), "2017-03-05T15:05:00+00:00");
        // No recording block
        assert_eq!(events[2].recording_status, "");
        assert_eq!(events[2].kind, EventKind::OnDemand);
    }

    #[test]
    fn test_filters_kind_client_side_and_limits() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 200, PAGE);

        let motions = HistoryQuery::new(10)
            .kind(EventKind::Motion)
            .execute(&client(&transport), 42)
            .unwrap();
        assert_eq!(motions.len(), 1);
        assert_eq!(motions[0].id, 2);

        let first_two = HistoryQuery::new(2).execute(&client(&transport), 42).unwrap();
        assert_eq!(first_two.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_null_flags_read_as_false() {
        let page = r#"[
            {"id": 5, "kind": "ding", "created_at": "2017-03-05T15:06:00.000Z",
             "answered": null, "favorite": null, "snapshot_url": null},
            {"id": 4, "kind": "motion", "created_at": "2017-03-05T15:05:00.000Z", "answered": false}
        ]"#;
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 200, page);

        let motions = HistoryQuery::new(1)
            .kind(EventKind::Motion)
            .execute(&client(&transport), 42)
            .unwrap();
        assert_eq!(motions.len(), 1);
        assert_eq!(motions[0].id, 4);

        let events = HistoryQuery::new(10).execute(&client(&transport), 42).unwrap();
        assert_eq!(events.len(), 2);
        assert!(!events[0].answered);
        assert!(!events[0].favorite);
        assert_eq!(events[0].snapshot_url, "");
    }

    #[test]
    fn test_zero_limit_rejected_without_request() {
        let transport = Arc::new(MockTransport::new());
        let result = HistoryQuery::new(0).execute(&client(&transport), 42);

        assert!(matches!(result, Err(ApiError::History(_))));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_error_status_and_bad_body() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 500, "");
        assert!(matches!(
            HistoryQuery::new(1).execute(&client(&transport), 42),
            Err(ApiError::History(_))
        ));

        transport.respond(Method::Get, "/clients_api/doorbots/42/history", 200, r#"{"oops":1}"#);
        assert!(matches!(
            HistoryQuery::new(1).execute(&client(&transport), 42),
            Err(ApiError::History(_))
        ));
    }
}
