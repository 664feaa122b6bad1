//! # Rates Client
//!
//! A typed Rust client for the exchange rate API, plus a conformance suite
//! that checks the service's documented success and failure behaviour.

pub mod client;
pub mod config;
pub mod conformance;
pub mod transport;

pub use client::ExchangeRateClient;
pub use config::{ClientConfig, ConfigError};
pub use conformance::{CheckReport, ConformanceReport, ConformanceSuite};
pub use transport::ReqwestTransport;

pub use rates_types::{
    Credential, DecodeError, Endpoint, EndpointKind, ErrorKind, ErrorResult, FetchError,
    FetchResult, HttpMethod, LatestRates, PairRate, RateResult, TransportError,
};
