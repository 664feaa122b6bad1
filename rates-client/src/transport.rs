//! reqwest-backed implementation of the transport port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;

use rates_types::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

const DEFAULT_USER_AGENT: &str = concat!("rates-client/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over a shared reqwest [`Client`].
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a request timeout and optional user agent.
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { http })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        let resp = builder
            .header(AUTHORIZATION, request.credential.bearer_header())
            .send()
            .await
            .map_err(map_error)?;

        // Error statuses still carry a classifiable body.
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(map_error)?;

        Ok(HttpResponse { status, body })
    }
}
