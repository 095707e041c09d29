/// REST endpoints of the Ring cloud API used by this crate
///
/// Paths are relative to [`ApiConfig::base_url`](crate::ApiConfig::base_url).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Login; answers 201 with the account profile and token
    Session,

    /// Every device visible to the account, grouped by family
    RingDevices,

    /// Event history of one doorbell
    DoorbellHistory { id: u64 },

    /// Doorbells wired to one chime
    ChimeLinkedDoorbells { id: u64 },

    /// Play a test tone on one chime
    ChimePlaySound { id: u64 },
}

impl Endpoint {
    /// Short stable name, used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Session => "session",
            Endpoint::RingDevices => "ring_devices",
            Endpoint::DoorbellHistory { .. } => "doorbell_history",
            Endpoint::ChimeLinkedDoorbells { .. } => "chime_linked_doorbells",
            Endpoint::ChimePlaySound { .. } => "chime_play_sound",
        }
    }

    /// Path of this endpoint, relative to the API root
    pub fn path(&self) -> String {
        match self {
            Endpoint::Session => "clients_api/session".to_string(),
            Endpoint::RingDevices => "clients_api/ring_devices".to_string(),
            Endpoint::DoorbellHistory { id } => format!("clients_api/doorbots/{}/history", id),
            Endpoint::ChimeLinkedDoorbells { id } => {
                format!("clients_api/chimes/{}/linked_doorbots", id)
            }
            Endpoint::ChimePlaySound { id } => format!("clients_api/chimes/{}/play_sound", id),
        }
    }
}
