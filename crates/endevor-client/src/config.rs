//! Client configuration.
//!
//! Transport-level knobs only; the connection target travels with each
//! call as a [`endevor_types::Service`] value. Defaults match how Endevor
//! web-services deployments are run in practice.

/// Configuration for building an [`crate::EndevorClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout in seconds. A timeout is indistinguishable from
    /// a refused connection to callers: both degrade to absent/empty.
    pub timeout_secs: u64,
    /// Accept unverifiable TLS certificates. Defaults to `true`: mainframe
    /// deployments routinely serve self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Retries after a failed send, with exponential backoff. Responses
    /// with a failure status are not retried; only the send itself.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            accept_invalid_certs: true,
            max_retries: 3,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ENDEVOR_TIMEOUT_SECS` (default: 30)
    /// - `ENDEVOR_ACCEPT_INVALID_CERTS` (`true`/`false`, default: true)
    /// - `ENDEVOR_MAX_RETRIES` (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_secs = match std::env::var("ENDEVOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ENDEVOR_TIMEOUT_SECS", raw))?,
            Err(_) => defaults.timeout_secs,
        };
        let accept_invalid_certs = match std::env::var("ENDEVOR_ACCEPT_INVALID_CERTS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ENDEVOR_ACCEPT_INVALID_CERTS", raw))?,
            Err(_) => defaults.accept_invalid_certs,
        };
        let max_retries = match std::env::var("ENDEVOR_MAX_RETRIES") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ENDEVOR_MAX_RETRIES", raw))?,
            Err(_) => defaults.max_retries,
        };
        Ok(Self {
            timeout_secs,
            accept_invalid_certs,
            max_retries,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value.
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
}
