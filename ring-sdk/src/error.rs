use thiserror::Error;

use crate::logging::LoggingError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] ring_api::ApiError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

impl SdkError {
    /// True when the cloud rejected the token or credentials
    pub fn is_auth_error(&self) -> bool {
        match self {
            SdkError::Api(e) => matches!(e, ring_api::ApiError::Auth(_)) || e.is_unauthorized(),
            _ => false,
        }
    }
}
