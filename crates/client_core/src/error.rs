use std::path::PathBuf;

use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiCallError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api rejected request: {0}")]
    Rejected(#[from] ApiError),
}

impl ApiCallError {
    /// Free-text message the server sent with a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(err) => err.payload(),
            Self::InvalidBaseUrl { .. } | Self::Transport(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected(err) => Some(err.status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::InvalidBaseUrl { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access token storage '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("token storage '{}' is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}
