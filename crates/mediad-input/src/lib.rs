//! Input plugin lifecycle for the `mediad` media daemon.
//!
//! Input plugins open streams for particular URI schemes. Each plugin is
//! described by an [`InputPlugin`] implementation registered, in priority
//! order, with an [`InputRegistry`]. At startup the daemon hands the registry
//! and its configuration blocks to [`InputPlugins::global_init`], which
//! brings up every plugin that configuration allows and records the outcome
//! in an [`EnablementTracker`]. At shutdown [`InputPlugins::global_finish`]
//! tears down exactly the plugins that came up.
//!
//! Initialisation distinguishes three failure tiers:
//!
//! - a plugin disabled by its block is skipped without a diagnostic;
//! - a plugin reporting [`InitOutcome::Unavailable`] is skipped with a
//!   warning;
//! - a plugin reporting [`InitOutcome::Fatal`] aborts startup with an
//!   [`InputError::Init`] naming the plugin.
//!
//! Diagnostics flow through an [`InputReporter`]; [`TracingReporter`] logs
//! them with `tracing` and [`SilentReporter`] discards them.

mod error;
mod lifecycle;
mod plugin;
mod registry;
mod reporter;
mod tracker;

pub use self::error::{InitFailure, InputError};
pub use self::lifecycle::{ENABLED_KEY, InputPlugins};
pub use self::plugin::{InitOutcome, InputPlugin};
pub use self::registry::InputRegistry;
pub use self::reporter::{InputReporter, SilentReporter, TracingReporter};
pub use self::tracker::EnablementTracker;

#[cfg(test)]
mod tests;
