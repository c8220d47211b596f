//! Shared configuration for the `mediad` media daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults are
//! overridden by a TOML configuration file (`--config-path` or
//! `MEDIAD_CONFIG_PATH`), then by `MEDIAD_*` environment variables, and
//! finally by command-line flags.
//!
//! Input plugins are configured through flat [`InputSetting`] entries which
//! [`Config::blocks`] folds into one [`ConfigBlock`] per plugin. The input
//! lifecycle consumes those blocks through the [`BlockSource`] trait.

mod block;
mod defaults;
mod logging;
mod setting;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use self::block::{
    BlockCategory, BlockError, BlockSource, ConfigBlock, ConfigBlocks, PLUGIN_KEY,
};
pub use self::defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use self::logging::{LogFormat, LogFormatParseError};
pub use self::setting::{InputSetting, InputSettingParseError, deduplicate_settings};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MEDIAD")]
pub struct Config {
    /// Tracing filter expression applied to daemon logs.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for daemon logs.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Per-plugin settings in `plugin:key=value` form.
    #[serde(default)]
    pub input_settings: Vec<InputSetting>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            input_settings: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the raw per-plugin settings.
    #[must_use]
    pub fn input_settings(&self) -> &[InputSetting] {
        &self.input_settings
    }

    /// Folds the per-plugin settings into configuration blocks.
    #[must_use]
    pub fn blocks(&self) -> ConfigBlocks {
        ConfigBlocks::from_settings(&self.input_settings)
    }
}
