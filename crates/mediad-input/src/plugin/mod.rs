//! Input plugin descriptors and the outcome of bringing one up.
//!
//! An [`InputPlugin`] is the static description of one input-stream backend:
//! its name, the URI prefixes it serves, and optional `init` and `finish`
//! hooks. Every hook has a default, so a backend only implements the ones it
//! needs. A backend with neither hook is always ready once its configuration
//! allows it.

use mediad_config::ConfigBlock;

use crate::error::InitFailure;

/// Result of attempting to bring up one input plugin.
#[derive(Debug)]
#[must_use]
pub enum InitOutcome {
    /// The plugin is ready for use until the lifecycle finishes.
    Success,
    /// A runtime dependency of the plugin is missing; the plugin is skipped
    /// and startup continues.
    Unavailable(String),
    /// The plugin cannot start and startup must abort.
    Fatal(InitFailure),
}

impl InitOutcome {
    /// Reports the plugin as unavailable for `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Reports a malformed configuration.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Fatal(InitFailure::config(message))
    }

    /// Returns `true` for [`InitOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<InitFailure> for InitOutcome {
    fn from(failure: InitFailure) -> Self {
        Self::Fatal(failure)
    }
}

impl<E> From<Result<(), E>> for InitOutcome
where
    E: Into<InitFailure>,
{
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(error) => Self::Fatal(error.into()),
        }
    }
}

/// Static description of one input-stream backend.
///
/// # Example
///
/// ```
/// use mediad_config::ConfigBlock;
/// use mediad_input::{InitOutcome, InputPlugin};
///
/// struct Ftp;
///
/// impl InputPlugin for Ftp {
///     fn name(&self) -> &str {
///         "ftp"
///     }
///
///     fn protocols(&self) -> &[&'static str] {
///         &["ftp://"]
///     }
///
///     fn init(&self, block: &ConfigBlock) -> InitOutcome {
///         match block.get_bool("passive", true) {
///             Ok(_) => InitOutcome::Success,
///             Err(error) => InitOutcome::config_error(error.to_string()),
///         }
///     }
/// }
///
/// assert!(Ftp.supports_uri("FTP://mirror.example/track.flac"));
/// assert!(Ftp.init(ConfigBlock::empty()).is_success());
/// ```
pub trait InputPlugin: Send + Sync {
    /// Unique, non-empty identifier; also the name of the plugin's
    /// configuration block.
    fn name(&self) -> &str;

    /// URI prefixes this plugin can open, such as `http://`.
    fn protocols(&self) -> &[&'static str] {
        &[]
    }

    /// Returns `true` when the plugin can open `uri`.
    ///
    /// The default matches `uri` against [`InputPlugin::protocols`] ignoring
    /// ASCII case.
    fn supports_uri(&self, uri: &str) -> bool {
        self.protocols()
            .iter()
            .any(|prefix| has_prefix_ignore_case(uri, prefix))
    }

    /// Brings the plugin up with its resolved configuration block.
    ///
    /// Plugins without start-up work keep the default, which always
    /// succeeds.
    fn init(&self, _block: &ConfigBlock) -> InitOutcome {
        InitOutcome::Success
    }

    /// Releases whatever [`InputPlugin::init`] acquired.
    ///
    /// Teardown has no error channel; implementations log their own failures
    /// and return normally.
    fn finish(&self) {}
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
