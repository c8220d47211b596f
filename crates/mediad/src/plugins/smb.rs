//! Shares reached over SMB/CIFS.

use std::sync::{Mutex, MutexGuard, PoisonError};

use mediad_config::ConfigBlock;
use mediad_input::{InitOutcome, InputPlugin};

const WORKGROUP_KEY: &str = "workgroup";

/// Input plugin for `smb://` URIs.
///
/// Without the `smb` cargo feature the plugin registers but always reports
/// itself unavailable, so startup continues without it.
#[derive(Debug, Default)]
pub struct SmbPlugin {
    workgroup: Mutex<Option<String>>,
}

impl SmbPlugin {
    /// Builds an uninitialised plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configured workgroup while the plugin is initialised.
    #[must_use]
    pub fn workgroup(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.workgroup.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputPlugin for SmbPlugin {
    fn name(&self) -> &str {
        "smb"
    }

    fn protocols(&self) -> &[&'static str] {
        &["smb://"]
    }

    fn init(&self, block: &ConfigBlock) -> InitOutcome {
        if !cfg!(feature = "smb") {
            return InitOutcome::unavailable("built without SMB support");
        }
        *self.lock() = block.get(WORKGROUP_KEY).map(str::to_owned);
        InitOutcome::Success
    }

    fn finish(&self) {
        *self.lock() = None;
    }
}
