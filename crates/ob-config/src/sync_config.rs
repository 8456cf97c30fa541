use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Coalescing window constraints (milliseconds). The window trades
// responsiveness against event-storm suppression.
pub const MIN_COALESCE_WINDOW_MS: u64 = 250;
pub const MAX_COALESCE_WINDOW_MS: u64 = 500;
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 350;

pub const DEFAULT_CHANNEL_PREFIX: &str = "tenant-db";

/// Realtime subscription settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Coalescing window for raw change bursts, in milliseconds
    pub coalesce_window_ms: u64,
    /// Prefix for per-tenant change-feed channel names
    pub channel_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            coalesce_window_ms: DEFAULT_COALESCE_WINDOW_MS,
            channel_prefix: String::from(DEFAULT_CHANNEL_PREFIX),
        }
    }
}

impl SyncConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.coalesce_window_ms < MIN_COALESCE_WINDOW_MS
            || self.coalesce_window_ms > MAX_COALESCE_WINDOW_MS
        {
            return Err(ConfigError::sync(format!(
                "sync.coalesce_window_ms must be {}-{}, got {}",
                MIN_COALESCE_WINDOW_MS, MAX_COALESCE_WINDOW_MS, self.coalesce_window_ms
            )));
        }

        if self.channel_prefix.is_empty() {
            return Err(ConfigError::sync("sync.channel_prefix must not be empty"));
        }

        Ok(())
    }
}
