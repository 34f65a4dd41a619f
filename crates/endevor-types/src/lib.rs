#![deny(missing_docs)]

//! # endevor-types — Foundational Types for the Endevor Web Services Client
//!
//! Value types shared by every consumer of the client: element addresses,
//! service locations, credentials, and retrieval results. This crate
//! performs no I/O — only `serde`, `thiserror`, `url`, and `zeroize` from
//! the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Immutable values.** Addresses and locations are constructed once and
//!    never mutated; every retrieval produces fresh values.
//!
//! 2. **Tagged unions over stringly-typed dispatch.** [`Credential`] and
//!    [`Protocol`] are enums matched exhaustively — adding a variant breaks
//!    compilation at every dispatch site instead of silently misbehaving.
//!
//! 3. **Lossless location round-trips.** [`ServiceLocation`] converts to and
//!    from its composed-URL form without losing protocol, hostname, port,
//!    or path.

pub mod address;
pub mod service;

pub use address::{
    DependentElementAddress, Element, ElementAddress, ElementSearchLocation,
    ElementWithDependencies, RetrievedElement, StageNumber, UpdateParams,
};
pub use service::{
    normalize_base_path, Credential, LocationError, Protocol, Service, ServiceLocation,
    V2_API_BASE_PATH,
};
