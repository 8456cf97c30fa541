use crate::{CoreError, Result};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Coarse category of domain data used as the granularity of invalidation,
/// deliberately coarser than individual record ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Maintenances,
    Providers,
    Vehicles,
    Categories,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        Self::Maintenances,
        Self::Providers,
        Self::Vehicles,
        Self::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenances => "maintenances",
            Self::Providers => "providers",
            Self::Vehicles => "vehicles",
            Self::Categories => "categories",
        }
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "maintenances" => Ok(Self::Maintenances),
            "providers" => Ok(Self::Providers),
            "vehicles" => Ok(Self::Vehicles),
            "categories" => Ok(Self::Categories),
            _ => Err(CoreError::InvalidEntityKind {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
