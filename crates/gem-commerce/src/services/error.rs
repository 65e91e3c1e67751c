//! Service error type.

use gem_data::FetchError;
use thiserror::Error;

/// A failed backend call, reduced to a message fit for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    /// Backend or transport message.
    pub message: String,
    /// HTTP status, when the backend answered.
    pub status: Option<u16>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

impl From<FetchError> for ServiceError {
    fn from(e: FetchError) -> Self {
        Self {
            message: e.user_message(),
            status: e.status(),
        }
    }
}
