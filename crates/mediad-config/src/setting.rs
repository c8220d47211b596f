//! Per-plugin settings supplied through files, the environment, or the CLI.
//!
//! Each [`InputSetting`] assigns one value to one key of one input plugin's
//! configuration block. The textual form `plugin:key=value` is accepted on
//! the command line, while configuration files use an array of tables:
//!
//! ```toml
//! [[input_settings]]
//! plugin = "http"
//! key = "proxy"
//! value = "proxy.example:3128"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing [`InputSetting`] values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputSettingParseError {
    /// Plugin separator (`:`) was missing from the setting.
    #[error("setting '{0}' is missing the plugin separator ':'")]
    MissingPlugin(String),
    /// Value assignment (`=`) was missing from the setting.
    #[error("setting '{0}' is missing the value assignment '='")]
    MissingValue(String),
    /// The plugin name was blank.
    #[error("setting '{0}' names an empty plugin")]
    EmptyPlugin(String),
    /// The key was blank.
    #[error("setting '{0}' names an empty key")]
    EmptyKey(String),
}

/// One key/value assignment scoped to a named input plugin.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InputSetting {
    /// Name of the input plugin the setting applies to, such as `http`.
    pub plugin: String,
    /// Setting key inside the plugin's block.
    pub key: String,
    /// Raw setting value; typed access happens through
    /// [`ConfigBlock`](crate::ConfigBlock).
    pub value: String,
}

impl InputSetting {
    /// Creates a new setting.
    #[must_use]
    pub fn new(
        plugin: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for InputSetting {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}={}", self.plugin, self.key, self.value)
    }
}

impl FromStr for InputSetting {
    type Err = InputSettingParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (plugin, rest) = input
            .split_once(':')
            .ok_or_else(|| InputSettingParseError::MissingPlugin(input.to_owned()))?;
        let (key, value) = rest
            .split_once('=')
            .ok_or_else(|| InputSettingParseError::MissingValue(input.to_owned()))?;
        if plugin.trim().is_empty() {
            return Err(InputSettingParseError::EmptyPlugin(input.to_owned()));
        }
        if key.trim().is_empty() {
            return Err(InputSettingParseError::EmptyKey(input.to_owned()));
        }
        Ok(Self::new(plugin.trim(), key.trim(), value.trim()))
    }
}

/// Deduplicates settings in-place, keeping the last value per plugin and key.
///
/// Plugin and key names are normalised to trimmed lower case. Plugins keep
/// the position of their first appearance so the resulting blocks are built
/// in a stable order.
pub fn deduplicate_settings(settings: &mut Vec<InputSetting>) {
    let mut plugin_order: Vec<String> = Vec::new();
    let mut merged: BTreeMap<(String, String), InputSetting> = BTreeMap::new();
    for mut setting in settings.drain(..) {
        let plugin = normalise_key(&setting.plugin);
        let key = normalise_key(&setting.key);
        if !plugin_order.contains(&plugin) {
            plugin_order.push(plugin.clone());
        }
        setting.plugin.clone_from(&plugin);
        setting.key.clone_from(&key);
        merged.insert((plugin, key), setting);
    }

    for plugin in plugin_order {
        settings.extend(
            merged
                .iter()
                .filter(|((owner, _), _)| *owner == plugin)
                .map(|(_, setting)| setting.clone()),
        );
    }
}

pub(crate) fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase()
}
