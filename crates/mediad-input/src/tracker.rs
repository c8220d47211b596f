//! Per-plugin record of successful initialisation.

/// One flag per registered plugin, `true` once the plugin has been brought
/// up and is therefore due a `finish` call.
///
/// Only the lifecycle mutates the tracker; everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnablementTracker {
    enabled: Vec<bool>,
}

impl EnablementTracker {
    /// Allocates a tracker for `len` plugins with every flag cleared.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            enabled: vec![false; len],
        }
    }

    /// Returns the number of tracked plugins.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Returns `true` when the tracker covers no plugins.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Returns whether the plugin at `index` is enabled. Out-of-range
    /// indices are never enabled.
    #[must_use]
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    /// Iterates over the indices of enabled plugins in ascending order.
    pub fn enabled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.enabled
            .iter()
            .enumerate()
            .filter_map(|(index, enabled)| enabled.then_some(index))
    }

    /// Returns the number of enabled plugins.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled_indices().count()
    }

    pub(crate) fn enable(&mut self, index: usize) {
        if let Some(flag) = self.enabled.get_mut(index) {
            *flag = true;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.enabled.fill(false);
    }
}
