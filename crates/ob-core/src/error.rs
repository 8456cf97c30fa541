use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid entity kind: {value} {location}")]
    InvalidEntityKind {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid invalidation reason: {value} {location}")]
    InvalidInvalidationReason {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
