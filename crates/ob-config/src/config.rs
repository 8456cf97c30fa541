use crate::{ConfigError, ConfigErrorResult, LoggingConfig, ReloadConfig, SyncConfig};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
    pub reload: ReloadConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for OB_CONFIG_DIR env var, else use ./.opsboard/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply OB_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        // Auto-create config directory
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: OB_CONFIG_DIR env var > ./.opsboard/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("OB_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".opsboard"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.sync.validate()?;
        self.reload.validate()?;

        Ok(())
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  logging: {} (dir: {})", *self.logging.level, self.logging.dir);
        info!(
            "  sync: coalesce={}ms, channel_prefix={}",
            self.sync.coalesce_window_ms, self.sync.channel_prefix
        );
        info!("  reload: debounce={}ms", self.reload.debounce_window_ms);
    }

    fn apply_env_overrides(&mut self) {
        // Logging
        Self::apply_env_parse("OB_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("OB_LOG_DIR", &mut self.logging.dir);

        // Sync
        Self::apply_env_parse(
            "OB_SYNC_COALESCE_WINDOW_MS",
            &mut self.sync.coalesce_window_ms,
        );
        Self::apply_env_string("OB_SYNC_CHANNEL_PREFIX", &mut self.sync.channel_prefix);

        // Reload
        Self::apply_env_parse(
            "OB_RELOAD_DEBOUNCE_WINDOW_MS",
            &mut self.reload.debounce_window_ms,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
