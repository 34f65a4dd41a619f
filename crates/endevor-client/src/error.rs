//! Client error types.
//!
//! Two failure families cross the public boundary: connection-level
//! failures ([`EndevorApiError::Http`]) and application-level failures the
//! service reports through a non-zero return code
//! ([`EndevorApiError::Api`]). Read paths absorb both into absent/empty
//! results; list and update paths return them to the caller.

use crate::config::ConfigError;
use crate::schema::ValidationError;

/// Errors from Endevor web-services calls.
#[derive(Debug, thiserror::Error)]
pub enum EndevorApiError {
    /// Connection-level failure: DNS, refused connection, or timeout.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// Which operation failed, e.g. `GET /{instance}/env/...`.
        endpoint: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The service processed the request and reported failure.
    #[error("Endevor {endpoint} returned RC={return_code}\n{detail}")]
    Api {
        /// Which operation failed.
        endpoint: String,
        /// Endevor return code; non-zero is never success.
        return_code: i32,
        /// Endevor reason code accompanying the return code.
        reason_code: i32,
        /// Request parameters and full response, for diagnostics.
        detail: String,
    },

    /// A response body did not match its expected structure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An element upload failed for a cause already logged in detail.
    #[error("element {element} cannot be uploaded")]
    Upload {
        /// `system/subsystem/type/name` of the element.
        element: String,
    },

    /// Client construction failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
