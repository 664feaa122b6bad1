//! Exchange rate API client.

use std::sync::Arc;

use rates_types::response::{decode, decode_latest, decode_pair};
use rates_types::{
    Credential, Endpoint, EndpointKind, FetchError, FetchResult, HttpMethod, HttpRequest,
    HttpResponse, LatestRates, PairRate, RateResult, Transport, TransportError,
};

use crate::config::ClientConfig;
use crate::transport::ReqwestTransport;

/// Exchange rate API client.
///
/// Holds only the base address, the credential and the transport, none of
/// which change after construction. Every call is one independent
/// request/response cycle with no retries, so a single client can be cloned
/// and shared freely between tasks.
///
/// # Example
///
/// ```no_run
/// use rates_client::ExchangeRateClient;
///
/// # async fn run() -> Result<(), rates_client::FetchError> {
/// let client = ExchangeRateClient::new("https://v6.exchangerate-api.com/v6", "my-key");
/// let latest = client.latest("USD").await?;
/// println!("1 USD = {:?} EUR", latest.rate("EUR"));
/// # Ok(())
/// # }
/// ```
pub struct ExchangeRateClient<T: Transport = ReqwestTransport> {
    base_url: String,
    credential: Credential,
    transport: Arc<T>,
}

impl<T: Transport> Clone for ExchangeRateClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            credential: self.credential.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl ExchangeRateClient<ReqwestTransport> {
    /// Creates a new client backed by a default reqwest transport.
    pub fn new(base_url: impl Into<String>, credential: impl Into<Credential>) -> Self {
        Self::with_transport(base_url, credential, ReqwestTransport::default())
    }

    /// Creates a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout, config.user_agent.as_deref())?;
        Ok(Self::with_transport(
            config.base_url.clone(),
            config.credential.clone(),
            transport,
        ))
    }
}

impl<T: Transport> ExchangeRateClient<T> {
    /// Creates a client over any transport implementation.
    pub fn with_transport(
        base_url: impl Into<String>,
        credential: impl Into<Credential>,
        transport: T,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: credential.into(),
            transport: Arc::new(transport),
        }
    }

    /// Returns a client sharing this transport and base address but
    /// authenticating with a different credential.
    pub fn with_credential(&self, credential: impl Into<Credential>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            credential: credential.into(),
            transport: Arc::clone(&self.transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gets all rates quoted against `code`.
    pub async fn latest(&self, code: &str) -> FetchResult<LatestRates> {
        let resp = self.send(HttpMethod::Get, &Endpoint::latest(code)).await?;
        log_outcome(decode_latest(resp.status, &resp.body))
    }

    /// Gets the conversion rate from `base` to `target`.
    pub async fn pair(&self, base: &str, target: &str) -> FetchResult<PairRate> {
        let resp = self
            .send(HttpMethod::Get, &Endpoint::pair(base, target))
            .await?;
        log_outcome(decode_pair(resp.status, &resp.body))
    }

    /// Gets the conversion rate from `base` to `target` via the plan-gated
    /// enriched endpoint.
    pub async fn enriched(&self, base: &str, target: &str) -> FetchResult<PairRate> {
        let resp = self
            .send(HttpMethod::Get, &Endpoint::enriched(base, target))
            .await?;
        log_outcome(decode_pair(resp.status, &resp.body))
    }

    /// Issues a GET for `kind` with positional currency arguments.
    ///
    /// # Panics
    ///
    /// Panics if the argument count does not match the endpoint kind.
    pub async fn fetch(&self, kind: EndpointKind, args: &[&str]) -> FetchResult<RateResult> {
        self.fetch_with_method(HttpMethod::Get, kind, args).await
    }

    /// Like [`fetch`](Self::fetch), with an explicitly chosen HTTP method.
    ///
    /// The service only serves GET; anything else is expected to come back
    /// as an `incorrect-http-method` service error.
    ///
    /// # Panics
    ///
    /// Panics if the argument count does not match the endpoint kind.
    pub async fn fetch_with_method(
        &self,
        method: HttpMethod,
        kind: EndpointKind,
        args: &[&str],
    ) -> FetchResult<RateResult> {
        self.call(method, &Endpoint::from_args(kind, args)).await
    }

    /// Issues a request for a fully specified endpoint.
    pub async fn call(&self, method: HttpMethod, endpoint: &Endpoint) -> FetchResult<RateResult> {
        let resp = self.send(method, endpoint).await?;
        log_outcome(decode(endpoint.kind(), resp.status, &resp.body))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%method, path = %endpoint))]
    async fn send(&self, method: HttpMethod, endpoint: &Endpoint) -> FetchResult<HttpResponse> {
        let request = HttpRequest {
            method,
            url: format!("{}/{}", self.base_url, endpoint.path()),
            credential: self.credential.clone(),
        };

        tracing::debug!("Sending request");

        let resp = self.transport.execute(request).await.map_err(|e| {
            tracing::error!(error = %e, "Transport failure");
            FetchError::Transport(e)
        })?;

        tracing::debug!(status = resp.status, "Received response");
        Ok(resp)
    }
}

fn log_outcome<R>(outcome: FetchResult<R>) -> FetchResult<R> {
    match &outcome {
        Ok(_) => tracing::debug!("Decoded success response"),
        Err(FetchError::Service(result)) => {
            tracing::warn!(
                error_type = %result.kind,
                status = result.status,
                "Service reported error"
            )
        }
        Err(FetchError::Decode(e)) => tracing::error!(error = %e, "Failed to decode response"),
        Err(FetchError::Transport(_)) => {}
    }
    outcome
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rates_types::ErrorKind;
    use rust_decimal::Decimal;

    use super::*;

    /// In-memory transport that records requests and replays one canned answer.
    pub struct CannedTransport {
        answer: Result<HttpResponse, TransportError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        pub fn body(status: u16, body: &str) -> Self {
            Self {
                answer: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(err: TransportError) -> Self {
            Self {
                answer: Err(err),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.answer.clone()
        }
    }

    fn client(transport: CannedTransport) -> ExchangeRateClient<CannedTransport> {
        ExchangeRateClient::with_transport("http://rates.test/v6/", "test-key", transport)
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = client(CannedTransport::body(200, "{}"));
        assert_eq!(client.base_url(), "http://rates.test/v6");
    }

    #[tokio::test]
    async fn test_latest_builds_get_with_bearer() {
        let client = client(CannedTransport::body(
            200,
            r#"{"result":"success","base_code":"USD","conversion_rates":{"USD":1,"EUR":0.9}}"#,
        ));

        let latest = client.latest("USD").await.unwrap();
        assert_eq!(latest.base_code, "USD");

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://rates.test/v6/latest/USD");
        assert_eq!(requests[0].credential.bearer_header(), "Bearer test-key");
    }

    #[tokio::test]
    async fn test_pair_and_enriched_urls() {
        let body = r#"{"result":"success","base_code":"GBP","target_code":"JPY","conversion_rate":190.5}"#;
        let client = client(CannedTransport::body(200, body));

        client.pair("GBP", "JPY").await.unwrap();
        client.enriched("GBP", "JPY").await.unwrap();

        let urls: Vec<String> = client
            .transport
            .requests()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://rates.test/v6/pair/GBP/JPY",
                "http://rates.test/v6/enriched/GBP/JPY"
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_with_post_surfaces_service_error() {
        let client = client(CannedTransport::body(
            405,
            r#"{"result":"error","error-type":"incorrect-http-method"}"#,
        ));

        let err = client
            .fetch_with_method(HttpMethod::Post, EndpointKind::Latest, &["USD"])
            .await
            .unwrap_err();

        assert_eq!(err.service_kind(), Some(&ErrorKind::IncorrectHttpMethod));
        assert_eq!(client.transport.requests()[0].method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn test_fetch_defaults_to_get() {
        let client = client(CannedTransport::body(
            200,
            r#"{"result":"success","base_code":"USD","target_code":"USD","conversion_rate":1}"#,
        ));

        let result = client
            .fetch(EndpointKind::Pair, &["USD", "USD"])
            .await
            .unwrap();

        match result {
            RateResult::Pair(pair) => assert_eq!(pair.conversion_rate, Decimal::ONE),
            other => panic!("expected pair result, got {:?}", other),
        }
        assert_eq!(client.transport.requests()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_invalid_key_on_http_200_is_service_error() {
        let client = client(CannedTransport::body(
            200,
            r#"{"result":"error","error-type":"invalid-key"}"#,
        ));

        let err = client.latest("USD").await.unwrap_err();
        assert_eq!(err.service_kind(), Some(&ErrorKind::InvalidKey));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_service_error() {
        let client = client(CannedTransport::failing(TransportError::Timeout));

        let err = client.pair("USD", "EUR").await.unwrap_err();
        assert_eq!(err, FetchError::Transport(TransportError::Timeout));
        assert!(err.service_kind().is_none());
    }

    #[tokio::test]
    async fn test_missing_result_is_decode_failure() {
        let client = client(CannedTransport::body(200, r#"{"base_code":"USD"}"#));

        let err = client.latest("USD").await.unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_with_credential_shares_transport() {
        let client = client(CannedTransport::body(
            200,
            r#"{"result":"error","error-type":"invalid-key"}"#,
        ));
        let other = client.with_credential("other-key");

        let _ = other.latest("USD").await;

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].credential.expose(), "other-key");
        assert_eq!(other.base_url(), client.base_url());
    }

    #[test]
    #[should_panic]
    fn test_fetch_wrong_arity_panics() {
        let client = client(CannedTransport::body(200, "{}"));
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _ = rt.block_on(client.fetch(EndpointKind::Pair, &["USD"]));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<C: Send + Sync + Clone>() {}
        assert_send_sync::<ExchangeRateClient>();
    }
}
