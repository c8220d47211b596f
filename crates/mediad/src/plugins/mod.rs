//! Input plugins compiled into the daemon.

mod file;
mod http;
mod smb;

use mediad_input::{InputError, InputRegistry};

pub use self::file::FilePlugin;
pub use self::http::{DEFAULT_CONNECT_TIMEOUT, HttpPlugin, HttpSettings, ProxyAddress};
pub use self::smb::SmbPlugin;

/// Builds the registry of built-in input plugins.
///
/// Registration order is dispatch priority: local files first, then HTTP,
/// then SMB.
///
/// # Errors
///
/// Returns [`InputError::Registry`] if a built-in name is rejected.
pub fn builtin_registry() -> Result<InputRegistry, InputError> {
    let mut registry = InputRegistry::new();
    registry.register(FilePlugin)?;
    registry.register(HttpPlugin::new())?;
    registry.register(SmbPlugin::new())?;
    Ok(registry)
}
