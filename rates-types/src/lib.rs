//! # Rates Types
//!
//! Core types for the exchange rate client and conformance harness.
//! This crate has ZERO IO dependencies - only data structures,
//! decoding rules, and trait definitions.
//!
//! ## Layout
//!
//! - `domain/` - Credential, endpoint routing, error taxonomy
//! - `response` - Typed success/error payloads and the decode path
//! - `error` - Decode, transport and fetch failure types
//! - `ports/` - Trait definitions that transport adapters must implement

pub mod domain;
pub mod error;
pub mod ports;
pub mod response;

// Re-export commonly used types
pub use domain::{Credential, Endpoint, EndpointKind, ErrorKind, build_path};
pub use error::{DecodeError, FetchError, FetchResult, TransportError};
pub use ports::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use response::{ErrorResult, LatestRates, PairRate, RateResult};
