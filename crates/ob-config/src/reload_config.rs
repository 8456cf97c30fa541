use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Reload debounce constraints (milliseconds)
pub const MIN_DEBOUNCE_WINDOW_MS: u64 = 50;
pub const MAX_DEBOUNCE_WINDOW_MS: u64 = 5000;
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 300;

/// Consumer-side reload scheduling settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Quiet window before a scheduled reload fires, in milliseconds.
    /// Each new qualifying trigger restarts the window (trailing-edge
    /// debounce).
    pub debounce_window_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
        }
    }
}

impl ReloadConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.debounce_window_ms < MIN_DEBOUNCE_WINDOW_MS
            || self.debounce_window_ms > MAX_DEBOUNCE_WINDOW_MS
        {
            return Err(ConfigError::reload(format!(
                "reload.debounce_window_ms must be {}-{}, got {}",
                MIN_DEBOUNCE_WINDOW_MS, MAX_DEBOUNCE_WINDOW_MS, self.debounce_window_ms
            )));
        }

        Ok(())
    }
}
