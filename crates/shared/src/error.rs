use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            400 | 422 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Error reply from the blog API: the status class plus the raw body text.
///
/// The backend answers errors with free text, so `message` is kept verbatim and
/// may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Server-provided message exactly as sent, if the body is not blank.
    pub fn payload(&self) -> Option<&str> {
        (!self.message.trim().is_empty()).then_some(self.message.as_str())
    }
}
