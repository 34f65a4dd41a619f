#![deny(missing_docs)]

//! # endevor-client — Typed Rust client for Endevor Web Services
//!
//! Remote retrieval and dependency resolution against an Endevor
//! software-configuration-management deployment:
//! - **Instances**: discover the named configurations a deployment hosts
//! - **Elements**: list, retrieve (with fingerprint), print, and update
//!   versioned artifacts
//! - **Dependencies**: resolve an element's first-level ACM component
//!   graph with per-branch failure isolation
//! - **Credentials**: probe a connection to confirm a credential is usable
//!
//! ## Failure model
//!
//! The upstream service is loosely typed and occasionally misbehaving, so
//! expected failures never escape as panics or unhandled errors. Read
//! paths absorb connection failures, non-zero return codes, and malformed
//! payloads into `None`/empty results after logging through [`tracing`];
//! only list and update calls, where the caller must react, surface an
//! [`EndevorApiError`].
//!
//! ## API path convention
//!
//! Every request is issued under the canonical v2 base path,
//! `{protocol}://{host}:{port}/EndevorService/api/v2/`, with legacy and v1
//! base paths rewritten at request-assembly time. Element requests follow
//! `{base}/{instance}/env/{env}/stgnum/{stage}/sys/{sys}/subsys/{subsys}/type/{type}/ele/{element}`.

pub mod config;
pub mod error;
pub mod schema;

mod auth;
mod dependencies;
mod elements;
mod instances;
mod rest;
mod retry;

pub use config::{ClientConfig, ConfigError};
pub use error::EndevorApiError;
pub use schema::ValidationError;

pub use endevor_types::{
    Credential, DependentElementAddress, Element, ElementAddress, ElementSearchLocation,
    ElementWithDependencies, Protocol, RetrievedElement, Service, ServiceLocation, StageNumber,
    UpdateParams,
};

use std::time::Duration;

/// Endevor web-services client. One instance is shared across calls; the
/// connection target ([`Service`]) travels with each call instead of being
/// baked into hidden session state.
#[derive(Debug, Clone)]
pub struct EndevorClient {
    http: reqwest::Client,
    retry: retry::RetryPolicy,
}

impl EndevorClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, EndevorApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| EndevorApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            retry: retry::RetryPolicy::new(config.max_retries),
        })
    }
}
