use crate::{CoreError, Result};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Why an invalidation event was produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationReason {
    /// Produced by the realtime change feed
    Realtime,
    /// Requested explicitly, e.g. a refresh button or a local mutation
    Manual,
    /// Produced by a backend/system-wide operation
    System,
}

impl InvalidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::Manual => "manual",
            Self::System => "system",
        }
    }
}

impl FromStr for InvalidationReason {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "realtime" => Ok(Self::Realtime),
            "manual" => Ok(Self::Manual),
            "system" => Ok(Self::System),
            _ => Err(CoreError::InvalidInvalidationReason {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
