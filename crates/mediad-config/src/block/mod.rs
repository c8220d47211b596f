//! Configuration blocks scoped to individual plugins.
//!
//! A [`ConfigBlock`] is an immutable snapshot of the key/value settings for
//! one plugin instance. Blocks are grouped by [`BlockCategory`] inside
//! [`ConfigBlocks`], which implements the [`BlockSource`] lookup consumed by
//! the input plugin lifecycle.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::setting::{InputSetting, deduplicate_settings, normalise_key};

/// Key that identifies which plugin an input block belongs to.
pub const PLUGIN_KEY: &str = "plugin";

static EMPTY_BLOCK: LazyLock<ConfigBlock> = LazyLock::new(ConfigBlock::default);

/// Section of the configuration a block belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BlockCategory {
    /// Blocks configuring input stream plugins.
    Input,
}

/// Errors raised when a block value cannot be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// The value was not a recognised boolean spelling.
    #[error("setting '{key}' expects a boolean, got '{value}'")]
    InvalidBool {
        /// Offending key.
        key: String,
        /// Raw value found in the block.
        value: String,
    },
    /// The value was not an unsigned integer.
    #[error("setting '{key}' expects an unsigned integer, got '{value}'")]
    InvalidUnsigned {
        /// Offending key.
        key: String,
        /// Raw value found in the block.
        value: String,
    },
    /// The value was zero where a positive number is required.
    #[error("setting '{key}' must be greater than zero")]
    NotPositive {
        /// Offending key.
        key: String,
    },
}

/// Immutable key/value settings for one plugin instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBlock {
    values: BTreeMap<String, String>,
}

impl ConfigBlock {
    /// Returns the canonical empty block shared by all plugins without an
    /// explicit configuration section.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_BLOCK
    }

    /// Builds a block from key/value pairs. Keys are normalised to trimmed
    /// lower case; later duplicates replace earlier ones.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(key, value)| (normalise_key(key.as_ref()), value.into()))
            .collect();
        Self { values }
    }

    /// Returns `true` when the block carries no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalise_key(key)).map(String::as_str)
    }

    /// Reads a boolean, falling back to `default` when the key is absent.
    ///
    /// Accepts `yes`, `true`, `on`, `1` and `no`, `false`, `off`, `0` in any
    /// letter case.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidBool`] for any other spelling.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, BlockError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "on" | "1" => Ok(true),
            "no" | "false" | "off" | "0" => Ok(false),
            _ => Err(BlockError::InvalidBool {
                key: key.to_owned(),
                value: raw.to_owned(),
            }),
        }
    }

    /// Reads an unsigned integer, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidUnsigned`] when the value does not parse.
    pub fn get_unsigned(&self, key: &str, default: u64) -> Result<u64, BlockError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        raw.trim()
            .parse()
            .map_err(|_| BlockError::InvalidUnsigned {
                key: key.to_owned(),
                value: raw.to_owned(),
            })
    }

    /// Reads a strictly positive integer, falling back to `default` when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidUnsigned`] when the value does not parse
    /// and [`BlockError::NotPositive`] when it is zero.
    pub fn get_positive(&self, key: &str, default: u64) -> Result<u64, BlockError> {
        match self.get_unsigned(key, default)? {
            0 => Err(BlockError::NotPositive {
                key: key.to_owned(),
            }),
            value => Ok(value),
        }
    }
}

/// Lookup of configuration blocks by category and identifying key.
pub trait BlockSource {
    /// Returns the first block in `category` whose `key` entry equals
    /// `name` ignoring ASCII case, or `None` when no such section exists.
    /// Plugin names are unique ignoring ASCII case, so `HTTP` and `http`
    /// select the same block.
    fn find_block(&self, category: BlockCategory, key: &str, name: &str) -> Option<&ConfigBlock>;
}

/// All configuration blocks grouped by category, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigBlocks {
    categories: BTreeMap<BlockCategory, Vec<ConfigBlock>>,
}

impl ConfigBlocks {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block to `category`.
    pub fn push(&mut self, category: BlockCategory, block: ConfigBlock) {
        self.categories.entry(category).or_default().push(block);
    }

    /// Builds one input block per plugin from flat settings.
    ///
    /// Settings are deduplicated first, so the last value for a key wins.
    #[must_use]
    pub fn from_settings(settings: &[InputSetting]) -> Self {
        let mut merged = settings.to_vec();
        deduplicate_settings(&mut merged);

        // Deduplication leaves each plugin's settings contiguous.
        let mut grouped: Vec<(String, Vec<(String, String)>)> = Vec::new();
        for setting in merged {
            match grouped.last_mut() {
                Some((plugin, pairs)) if *plugin == setting.plugin => {
                    pairs.push((setting.key, setting.value));
                }
                _ => grouped.push((setting.plugin, vec![(setting.key, setting.value)])),
            }
        }

        let mut blocks = Self::new();
        for (plugin, mut pairs) in grouped {
            pairs.retain(|(key, _)| key != PLUGIN_KEY);
            pairs.push((PLUGIN_KEY.to_owned(), plugin));
            blocks.push(BlockCategory::Input, ConfigBlock::from_pairs(pairs));
        }
        blocks
    }

    /// Returns the blocks declared for `category`.
    #[must_use]
    pub fn category(&self, category: BlockCategory) -> &[ConfigBlock] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl BlockSource for ConfigBlocks {
    fn find_block(&self, category: BlockCategory, key: &str, name: &str) -> Option<&ConfigBlock> {
        self.category(category)
            .iter()
            .find(|block| block.get(key).is_some_and(|value| value.eq_ignore_ascii_case(name)))
    }
}
