use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage error on key {key}: {message} {location}")]
    Storage {
        key: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Key enumeration failed: {message} {location}")]
    Enumeration {
        message: String,
        location: ErrorLocation,
    },
}

impl CacheError {
    /// Create a per-key storage error
    #[track_caller]
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        CacheError::Storage {
            key: key.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a key enumeration error
    #[track_caller]
    pub fn enumeration<S: Into<String>>(message: S) -> Self {
        CacheError::Enumeration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
