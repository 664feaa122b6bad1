//! HTTP transport port.
//!
//! Implementations can be real HTTP clients, canned test transports, etc.

use std::fmt;

use crate::domain::Credential;
use crate::error::TransportError;

/// HTTP verbs the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// A fully built request: verb, absolute URL and bearer credential.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub credential: Credential,
}

/// Status and raw body of any HTTP response, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Port trait for HTTP transports.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Executes the request and returns whatever the server answered.
    ///
    /// Must return `Ok` for every response that carries a body, regardless of
    /// status. `Err` is reserved for failures where no response was received.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
