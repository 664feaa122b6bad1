//! Failure types for a single fetch.
//!
//! A fetch fails in exactly one of three ways:
//! - the service answered with a taxonomy-tagged error body ([`FetchError::Service`]),
//! - the service answered but the body did not match the contract ([`FetchError::Decode`]),
//! - no body was ever received ([`FetchError::Transport`]).

use rust_decimal::Decimal;

use crate::domain::ErrorKind;
use crate::response::ErrorResult;

/// The body did not match the expected response contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid JSON (HTTP {status}): {message}")]
    Json { status: u16, message: String },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unexpected result value: {0}")]
    UnexpectedResult(String),

    #[error("Unexpected shape: {0}")]
    Shape(String),

    #[error("Rate for {code} against itself is {rate}, expected 1")]
    IdentityRate { code: String, rate: Decimal },
}

/// The request never produced a response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Outcome of a failed fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Service error: {}", .0.kind)]
    Service(ErrorResult),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FetchError {
    /// The taxonomy tag, if the service reported one.
    pub fn service_kind(&self) -> Option<&ErrorKind> {
        match self {
            FetchError::Service(result) => Some(&result.kind),
            _ => None,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
