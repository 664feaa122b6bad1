//! Conformance checks for the exchange rate service.
//!
//! Each check issues one or more real requests through an
//! [`ExchangeRateClient`] and asserts on the classified outcome: success
//! payload contents, or the exact taxonomy tag of a service error.

use rust_decimal::Decimal;
use serde::Serialize;

use rates_types::{
    Credential, EndpointKind, ErrorKind, FetchError, FetchResult, HttpMethod, Transport,
};

use crate::client::ExchangeRateClient;
use crate::transport::ReqwestTransport;

/// Currencies whose `latest` rates must come back quoted against themselves.
pub const LATEST_CODES: [&str; 5] = ["USD", "EUR", "GBP", "CHF", "PLN"];

/// Currency pairs expected to convert successfully.
pub const PAIRS: [(&str, &str); 4] = [
    ("USD", "EUR"),
    ("EUR", "GBP"),
    ("GBP", "CHF"),
    ("CHF", "PLN"),
];

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckReport {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Results of a full suite run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConformanceReport {
    pub checks: Vec<CheckReport>,
}

impl ConformanceReport {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckReport> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Asserts that `outcome` is a service error tagged `expected`.
fn expect_service_error<R>(
    name: String,
    outcome: FetchResult<R>,
    expected: ErrorKind,
) -> CheckReport {
    match outcome {
        Err(FetchError::Service(result)) if result.kind == expected => CheckReport::pass(
            name,
            format!("service error {} (HTTP {})", result.kind, result.status),
        ),
        Err(FetchError::Service(result)) => CheckReport::fail(
            name,
            format!("expected {}, got service error {}", expected, result.kind),
        ),
        Err(other) => CheckReport::fail(name, format!("expected {}, got {}", expected, other)),
        Ok(_) => CheckReport::fail(name, format!("expected {}, got success", expected)),
    }
}

/// Suite of service conformance checks.
///
/// Owns a client authenticated with the real credential and a second one
/// sharing its transport but sending a garbled credential.
pub struct ConformanceSuite<T: Transport = ReqwestTransport> {
    client: ExchangeRateClient<T>,
    garbled: ExchangeRateClient<T>,
}

impl<T: Transport> ConformanceSuite<T> {
    pub fn new(client: ExchangeRateClient<T>) -> Self {
        let garbled = client.with_credential(Credential::garbled());
        Self { client, garbled }
    }

    /// Runs every check in order.
    pub async fn run_all(&self) -> ConformanceReport {
        let mut checks = Vec::new();

        for code in LATEST_CODES {
            checks.push(self.latest_base_matches(code).await);
        }
        checks.push(self.latest_identity_rate("USD").await);
        checks.push(self.latest_unsupported_code().await);
        checks.push(self.invalid_key(EndpointKind::Latest, &["USD"]).await);
        checks.push(self.post_rejected(EndpointKind::Latest, &["USD"]).await);

        for (base, target) in PAIRS {
            checks.push(self.pair_success(base, target).await);
        }
        checks.push(self.pair_identity_rate("USD").await);
        checks.push(self.pair_unsupported_code().await);
        checks.push(self.pair_malformed_request().await);
        checks.push(self.invalid_key(EndpointKind::Pair, &["USD", "USD"]).await);
        checks.push(self.post_rejected(EndpointKind::Pair, &["USD", "USD"]).await);

        checks.push(self.enriched_plan_upgrade_required().await);

        for check in &checks {
            if check.passed {
                tracing::info!(check = %check.name, "Check passed");
            } else {
                tracing::warn!(check = %check.name, detail = %check.detail, "Check failed");
            }
        }

        ConformanceReport { checks }
    }

    /// `latest/{code}` succeeds and echoes `code` as the base.
    pub async fn latest_base_matches(&self, code: &str) -> CheckReport {
        let name = format!("latest_base_matches[{}]", code);
        match self.client.latest(code).await {
            Ok(latest) if latest.base_code == code => {
                CheckReport::pass(name, format!("{} rates", latest.conversion_rates.len()))
            }
            Ok(latest) => CheckReport::fail(name, format!("base_code was {}", latest.base_code)),
            Err(e) => CheckReport::fail(name, e.to_string()),
        }
    }

    /// `latest/{code}` quotes `code` against itself at exactly 1.
    pub async fn latest_identity_rate(&self, code: &str) -> CheckReport {
        let name = format!("latest_identity_rate[{}]", code);
        match self.client.latest(code).await {
            Ok(latest) => match latest.rate(code) {
                Some(rate) if rate == Decimal::ONE => CheckReport::pass(name, "rate is 1"),
                Some(rate) => CheckReport::fail(name, format!("rate was {}", rate)),
                None => CheckReport::fail(name, "no entry for base currency"),
            },
            Err(e) => CheckReport::fail(name, e.to_string()),
        }
    }

    pub async fn latest_unsupported_code(&self) -> CheckReport {
        expect_service_error(
            "latest_unsupported_code".to_string(),
            self.client.latest("UnsupportedCurrencyCode").await,
            ErrorKind::UnsupportedCode,
        )
    }

    /// `pair/{base}/{target}` succeeds and echoes both codes.
    pub async fn pair_success(&self, base: &str, target: &str) -> CheckReport {
        let name = format!("pair_success[{}/{}]", base, target);
        match self.client.pair(base, target).await {
            Ok(pair) if pair.base_code == base && pair.target_code == target => {
                CheckReport::pass(name, format!("rate {}", pair.conversion_rate))
            }
            Ok(pair) => {
                CheckReport::fail(name, format!("got {}/{}", pair.base_code, pair.target_code))
            }
            Err(e) => CheckReport::fail(name, e.to_string()),
        }
    }

    /// `pair/{code}/{code}` converts at exactly 1.
    pub async fn pair_identity_rate(&self, code: &str) -> CheckReport {
        let name = format!("pair_identity_rate[{}]", code);
        match self.client.pair(code, code).await {
            Ok(pair) if pair.conversion_rate == Decimal::ONE => {
                CheckReport::pass(name, "rate is 1")
            }
            Ok(pair) => CheckReport::fail(name, format!("rate was {}", pair.conversion_rate)),
            Err(e) => CheckReport::fail(name, e.to_string()),
        }
    }

    pub async fn pair_unsupported_code(&self) -> CheckReport {
        expect_service_error(
            "pair_unsupported_code".to_string(),
            self.client.pair("USD", "PPP").await,
            ErrorKind::UnsupportedCode,
        )
    }

    pub async fn pair_malformed_request(&self) -> CheckReport {
        expect_service_error(
            "pair_malformed_request".to_string(),
            self.client.pair("USD", "UnsupportedRateCode").await,
            ErrorKind::MalformedRequest,
        )
    }

    /// A garbled credential yields `invalid-key`, never a transport failure.
    pub async fn invalid_key(&self, kind: EndpointKind, args: &[&str]) -> CheckReport {
        expect_service_error(
            format!("{}_invalid_key", kind),
            self.garbled.fetch(kind, args).await,
            ErrorKind::InvalidKey,
        )
    }

    /// A POST to a GET-only endpoint yields `incorrect-http-method`.
    pub async fn post_rejected(&self, kind: EndpointKind, args: &[&str]) -> CheckReport {
        expect_service_error(
            format!("{}_post_rejected", kind),
            self.client.fetch_with_method(HttpMethod::Post, kind, args).await,
            ErrorKind::IncorrectHttpMethod,
        )
    }

    pub async fn enriched_plan_upgrade_required(&self) -> CheckReport {
        expect_service_error(
            "enriched_plan_upgrade_required".to_string(),
            self.client.enriched("GBP", "JPY").await,
            ErrorKind::PlanUpgradeRequired,
        )
    }
}
