//! Streams served over HTTP and HTTPS.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mediad_config::ConfigBlock;
use mediad_input::{InitFailure, InitOutcome, InputPlugin};

const PROXY_KEY: &str = "proxy";
const CONNECT_TIMEOUT_KEY: &str = "connect_timeout";
const VERIFY_PEER_KEY: &str = "verify_peer";

/// Connection timeout used when the block does not set `connect_timeout`.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Proxy server given as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAddress {
    host: String,
    port: u16,
}

impl ProxyAddress {
    /// Parses a `host:port` pair.
    ///
    /// # Errors
    ///
    /// Returns [`InitFailure::Config`] when the host is missing or the port
    /// is not a non-zero 16-bit number.
    pub fn parse(value: &str) -> Result<Self, InitFailure> {
        let malformed = || InitFailure::config(format!("proxy '{value}' must be host:port"));
        let (host, port) = value.trim().rsplit_once(':').ok_or_else(malformed)?;
        if host.is_empty() {
            return Err(malformed());
        }
        match port.parse::<u16>() {
            Ok(0) | Err(_) => Err(malformed()),
            Ok(port_number) => Ok(Self {
                host: host.to_owned(),
                port: port_number,
            }),
        }
    }

    /// Returns the proxy host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the proxy port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ProxyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Settings read from the `http` input block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Proxy every request goes through, if any.
    pub proxy: Option<ProxyAddress>,
    /// Upper bound on establishing a connection.
    pub connect_timeout: Duration,
    /// Whether TLS peers must present a valid certificate.
    pub verify_peer: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            verify_peer: true,
        }
    }
}

impl HttpSettings {
    /// Reads the settings from a configuration block.
    ///
    /// # Errors
    ///
    /// Returns [`InitFailure::Config`] for a malformed proxy, a timeout that
    /// is not a positive number of seconds, or a `verify_peer` value that is
    /// not a boolean.
    pub fn from_block(block: &ConfigBlock) -> Result<Self, InitFailure> {
        let proxy = block.get(PROXY_KEY).map(ProxyAddress::parse).transpose()?;
        let timeout_secs =
            block.get_positive(CONNECT_TIMEOUT_KEY, DEFAULT_CONNECT_TIMEOUT.as_secs())?;
        let verify_peer = block.get_bool(VERIFY_PEER_KEY, true)?;
        Ok(Self {
            proxy,
            connect_timeout: Duration::from_secs(timeout_secs),
            verify_peer,
        })
    }
}

/// Input plugin for `http://` and `https://` streams.
///
/// Holds its parsed settings between `init` and `finish`.
#[derive(Debug, Default)]
pub struct HttpPlugin {
    settings: Mutex<Option<HttpSettings>>,
}

impl HttpPlugin {
    /// Builds an uninitialised plugin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active settings, or `None` outside `init`..`finish`.
    #[must_use]
    pub fn settings(&self) -> Option<HttpSettings> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<HttpSettings>> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputPlugin for HttpPlugin {
    fn name(&self) -> &str {
        "http"
    }

    fn protocols(&self) -> &[&'static str] {
        &["http://", "https://"]
    }

    fn init(&self, block: &ConfigBlock) -> InitOutcome {
        HttpSettings::from_block(block)
            .map(|settings| {
                *self.lock() = Some(settings);
            })
            .into()
    }

    fn finish(&self) {
        *self.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn block(pairs: &[(&str, &str)]) -> ConfigBlock {
        ConfigBlock::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn empty_block_yields_defaults() {
        let settings = HttpSettings::from_block(ConfigBlock::empty()).expect("defaults parse");
        assert_eq!(settings, HttpSettings::default());
    }

    #[test]
    fn reads_every_setting() {
        let settings = HttpSettings::from_block(&block(&[
            ("proxy", "cache.local:3128"),
            ("connect_timeout", "3"),
            ("verify_peer", "no"),
        ]))
        .expect("settings parse");

        let proxy = settings.proxy.expect("proxy is set");
        assert_eq!(proxy.host(), "cache.local");
        assert_eq!(proxy.port(), 3128);
        assert_eq!(proxy.to_string(), "cache.local:3128");
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert!(!settings.verify_peer);
    }

    #[rstest]
    #[case::missing_port("proxy", "cache.local")]
    #[case::missing_host("proxy", ":3128")]
    #[case::zero_port("proxy", "cache.local:0")]
    #[case::port_overflow("proxy", "cache.local:70000")]
    #[case::zero_timeout("connect_timeout", "0")]
    #[case::word_timeout("connect_timeout", "soon")]
    #[case::bad_bool("verify_peer", "sometimes")]
    fn malformed_values_are_config_failures(#[case] key: &str, #[case] value: &str) {
        let error = HttpSettings::from_block(&block(&[(key, value)]))
            .expect_err("malformed value is rejected");
        assert!(matches!(error, InitFailure::Config { .. }));
        assert!(error.to_string().contains(key), "message: {error}");
    }

    #[test]
    fn init_stores_settings_until_finish() {
        let plugin = HttpPlugin::new();
        assert!(plugin.settings().is_none());

        assert!(plugin.init(&block(&[("connect_timeout", "5")])).is_success());
        assert_eq!(
            plugin.settings().map(|settings| settings.connect_timeout),
            Some(Duration::from_secs(5))
        );

        plugin.finish();
        assert!(plugin.settings().is_none());
    }

    #[test]
    fn init_with_bad_block_is_fatal() {
        let plugin = HttpPlugin::new();
        let outcome = plugin.init(&block(&[("verify_peer", "perhaps")]));
        assert!(matches!(outcome, InitOutcome::Fatal(InitFailure::Config { .. })));
        assert!(plugin.settings().is_none());
    }

    #[rstest]
    #[case("http://radio.example/stream", true)]
    #[case("HTTPS://radio.example/stream", true)]
    #[case("smb://share/track.flac", false)]
    fn serves_http_schemes(#[case] uri: &str, #[case] expected: bool) {
        assert_eq!(HttpPlugin::new().supports_uri(uri), expected);
    }
}
