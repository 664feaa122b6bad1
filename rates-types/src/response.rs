//! Typed response payloads and the decode path shared by every endpoint.
//!
//! Every body is classified on its top-level `result` field before any
//! shape-specific decoding happens. HTTP status is carried along for
//! diagnostics only and never decides the outcome.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{EndpointKind, ErrorKind};
use crate::error::{DecodeError, FetchError, FetchResult};

/// Field carrying the taxonomy tag in error bodies.
pub const ERROR_TYPE_FIELD: &str = "error-type";

// ─────────────────────────────────────────────────────────────────────────────
// Success payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Rates for every supported currency, quoted against `base_code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRates {
    pub base_code: String,
    pub conversion_rates: BTreeMap<String, Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_update_at: Option<DateTime<Utc>>,
}

impl LatestRates {
    /// Rate for one unit of the base currency in `code`.
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.conversion_rates.get(code).copied()
    }
}

/// Single conversion rate from `base_code` to `target_code`.
///
/// Shared by the `pair` and `enriched` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairRate {
    pub base_code: String,
    pub target_code: String,
    pub conversion_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_update_at: Option<DateTime<Utc>>,
}

impl PairRate {
    /// Converts an amount of the base currency into the target currency.
    pub fn convert(&self, amount: Decimal) -> Decimal {
        amount * self.conversion_rate
    }
}

/// A successful response from any endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "endpoint", rename_all = "lowercase")]
pub enum RateResult {
    Latest(LatestRates),
    Pair(PairRate),
    Enriched(PairRate),
}

impl RateResult {
    pub fn kind(&self) -> EndpointKind {
        match self {
            RateResult::Latest(_) => EndpointKind::Latest,
            RateResult::Pair(_) => EndpointKind::Pair,
            RateResult::Enriched(_) => EndpointKind::Enriched,
        }
    }

    pub fn base_code(&self) -> &str {
        match self {
            RateResult::Latest(latest) => &latest.base_code,
            RateResult::Pair(pair) | RateResult::Enriched(pair) => &pair.base_code,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error payload
// ─────────────────────────────────────────────────────────────────────────────

/// A service-reported business error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub kind: ErrorKind,
    /// HTTP status the body arrived with.
    pub status: u16,
    /// Unmodified response body.
    pub raw_body: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LatestWire {
    base_code: String,
    conversion_rates: BTreeMap<String, Decimal>,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
    #[serde(default)]
    time_next_update_unix: Option<i64>,
}

#[derive(Deserialize)]
struct PairWire {
    base_code: String,
    target_code: String,
    conversion_rate: Decimal,
    #[serde(default)]
    time_last_update_unix: Option<i64>,
    #[serde(default)]
    time_next_update_unix: Option<i64>,
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Parses the body and branches on `result`.
///
/// Returns the parsed document on `"success"`, the service error on
/// `"error"`, and a [`DecodeError`] for anything else.
fn classify(status: u16, body: &str) -> FetchResult<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| DecodeError::Json {
        status,
        message: e.to_string(),
    })?;

    let result = value
        .get("result")
        .ok_or(DecodeError::MissingField("result"))?;

    match result.as_str() {
        Some("success") => Ok(value),
        Some("error") => {
            let tag = match value.get(ERROR_TYPE_FIELD) {
                Some(Value::String(tag)) => tag,
                Some(other) => {
                    return Err(DecodeError::Shape(format!(
                        "{} must be a string, got {}",
                        ERROR_TYPE_FIELD, other
                    ))
                    .into());
                }
                None => return Err(DecodeError::MissingField(ERROR_TYPE_FIELD).into()),
            };
            Err(FetchError::Service(ErrorResult {
                kind: ErrorKind::parse(tag),
                status,
                raw_body: body.to_string(),
            }))
        }
        Some(other) => Err(DecodeError::UnexpectedResult(other.to_string()).into()),
        None => Err(DecodeError::UnexpectedResult(result.to_string()).into()),
    }
}

/// Decodes a `latest` response.
///
/// The base currency must appear in `conversion_rates` with a rate of exactly 1.
pub fn decode_latest(status: u16, body: &str) -> FetchResult<LatestRates> {
    let value = classify(status, body)?;
    let wire: LatestWire =
        serde_json::from_value(value).map_err(|e| DecodeError::Shape(e.to_string()))?;

    match wire.conversion_rates.get(&wire.base_code) {
        Some(rate) if *rate == Decimal::ONE => {}
        Some(rate) => {
            return Err(DecodeError::IdentityRate {
                code: wire.base_code,
                rate: *rate,
            }
            .into());
        }
        None => {
            return Err(DecodeError::Shape(format!(
                "conversion_rates has no entry for base {}",
                wire.base_code
            ))
            .into());
        }
    }

    Ok(LatestRates {
        base_code: wire.base_code,
        conversion_rates: wire.conversion_rates,
        updated_at: timestamp(wire.time_last_update_unix),
        next_update_at: timestamp(wire.time_next_update_unix),
    })
}

/// Decodes a `pair` or `enriched` response.
///
/// When base and target are the same currency the rate must be exactly 1.
pub fn decode_pair(status: u16, body: &str) -> FetchResult<PairRate> {
    let value = classify(status, body)?;
    let wire: PairWire =
        serde_json::from_value(value).map_err(|e| DecodeError::Shape(e.to_string()))?;

    if wire.base_code == wire.target_code && wire.conversion_rate != Decimal::ONE {
        return Err(DecodeError::IdentityRate {
            code: wire.base_code,
            rate: wire.conversion_rate,
        }
        .into());
    }

    Ok(PairRate {
        base_code: wire.base_code,
        target_code: wire.target_code,
        conversion_rate: wire.conversion_rate,
        updated_at: timestamp(wire.time_last_update_unix),
        next_update_at: timestamp(wire.time_next_update_unix),
    })
}

/// Decodes a response for any endpoint kind.
pub fn decode(kind: EndpointKind, status: u16, body: &str) -> FetchResult<RateResult> {
    match kind {
        EndpointKind::Latest => decode_latest(status, body).map(RateResult::Latest),
        EndpointKind::Pair => decode_pair(status, body).map(RateResult::Pair),
        EndpointKind::Enriched => decode_pair(status, body).map(RateResult::Enriched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LATEST_USD: &str = r#"{
        "result": "success",
        "documentation": "https://www.exchangerate-api.com/docs",
        "time_last_update_unix": 1585267200,
        "time_next_update_unix": 1585353700,
        "base_code": "USD",
        "conversion_rates": { "USD": 1, "EUR": 0.9013, "GBP": 0.7679, "PLN": 4.0512 }
    }"#;

    #[test]
    fn test_decode_latest_success() {
        let latest = decode_latest(200, LATEST_USD).unwrap();
        assert_eq!(latest.base_code, "USD");
        assert_eq!(latest.rate("USD"), Some(Decimal::ONE));
        assert_eq!(latest.rate("EUR"), Some(dec!(0.9013)));
        assert_eq!(latest.rate("JPY"), None);
        assert_eq!(
            latest.updated_at.unwrap().to_rfc3339(),
            "2020-03-27T00:00:00+00:00"
        );
    }

    #[test]
    fn test_identity_rate_with_trailing_zeros() {
        let body = r#"{"result":"success","base_code":"CHF","conversion_rates":{"CHF":1.000000,"EUR":0.95}}"#;
        let latest = decode_latest(200, body).unwrap();
        assert_eq!(latest.rate("CHF"), Some(Decimal::ONE));
        assert!(latest.updated_at.is_none());
    }

    #[test]
    fn test_latest_identity_violation() {
        let body = r#"{"result":"success","base_code":"USD","conversion_rates":{"USD":1.0001}}"#;
        let err = decode_latest(200, body).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode(DecodeError::IdentityRate { ref code, .. }) if code == "USD"
        ));
    }

    #[test]
    fn test_latest_missing_base_entry() {
        let body = r#"{"result":"success","base_code":"USD","conversion_rates":{"EUR":0.9}}"#;
        let err = decode_latest(200, body).unwrap_err();
        assert!(matches!(err, FetchError::Decode(DecodeError::Shape(_))));
    }

    #[test]
    fn test_decode_pair_success() {
        let body = r#"{"result":"success","base_code":"EUR","target_code":"GBP","conversion_rate":0.8412}"#;
        let pair = decode_pair(200, body).unwrap();
        assert_eq!(pair.base_code, "EUR");
        assert_eq!(pair.target_code, "GBP");
        assert_eq!(pair.conversion_rate, dec!(0.8412));
        assert_eq!(pair.convert(dec!(100)), dec!(84.1200));
    }

    #[test]
    fn test_pair_same_currency_must_be_one() {
        let ok = r#"{"result":"success","base_code":"USD","target_code":"USD","conversion_rate":1}"#;
        assert_eq!(decode_pair(200, ok).unwrap().conversion_rate, Decimal::ONE);

        let bad = r#"{"result":"success","base_code":"USD","target_code":"USD","conversion_rate":0.99}"#;
        assert!(matches!(
            decode_pair(200, bad),
            Err(FetchError::Decode(DecodeError::IdentityRate { .. }))
        ));
    }

    #[test]
    fn test_rates_keep_full_decimal_precision() {
        let body = r#"{"result":"success","base_code":"USD","target_code":"USD","conversion_rate":1.00000000000000001}"#;
        match decode_pair(200, body) {
            Err(FetchError::Decode(DecodeError::IdentityRate { rate, .. })) => {
                assert_eq!(rate, dec!(1.00000000000000001));
            }
            other => panic!("expected identity rate error, got {:?}", other),
        }

        let body = r#"{"result":"success","base_code":"EUR","conversion_rates":{"EUR":1.00000000000000001}}"#;
        assert!(matches!(
            decode_latest(200, body),
            Err(FetchError::Decode(DecodeError::IdentityRate { .. }))
        ));

        let body = r#"{"result":"success","base_code":"EUR","target_code":"JPY","conversion_rate":161.123456789012345678}"#;
        assert_eq!(
            decode_pair(200, body).unwrap().conversion_rate,
            dec!(161.123456789012345678)
        );
    }

    #[test]
    fn test_error_body_is_service_error() {
        let body = r#"{"result":"error","error-type":"unsupported-code"}"#;
        let err = decode_pair(200, body).unwrap_err();
        match err {
            FetchError::Service(result) => {
                assert_eq!(result.kind, ErrorKind::UnsupportedCode);
                assert_eq!(result.status, 200);
                assert_eq!(result.raw_body, body);
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_body_with_non_200_status() {
        let body = r#"{"result":"error","error-type":"incorrect-http-method"}"#;
        let err = decode_latest(405, body).unwrap_err();
        assert_eq!(err.service_kind(), Some(&ErrorKind::IncorrectHttpMethod));
    }

    #[test]
    fn test_unknown_error_tag() {
        let body = r#"{"result":"error","error-type":"too-many-cooks"}"#;
        let err = decode_latest(200, body).unwrap_err();
        assert_eq!(
            err.service_kind(),
            Some(&ErrorKind::Unknown("too-many-cooks".into()))
        );
    }

    #[test]
    fn test_error_without_tag_is_decode_error() {
        let body = r#"{"result":"error"}"#;
        assert_eq!(
            decode_latest(200, body).unwrap_err(),
            FetchError::Decode(DecodeError::MissingField("error-type"))
        );
    }

    #[test]
    fn test_non_string_error_tag_is_shape_error() {
        let body = r#"{"result":"error","error-type":5}"#;
        assert!(matches!(
            decode_pair(200, body),
            Err(FetchError::Decode(DecodeError::Shape(_)))
        ));
    }

    #[test]
    fn test_missing_result_is_decode_error() {
        let body = r#"{"base_code":"USD","conversion_rates":{"USD":1}}"#;
        assert_eq!(
            decode_latest(200, body).unwrap_err(),
            FetchError::Decode(DecodeError::MissingField("result"))
        );
    }

    #[test]
    fn test_unexpected_result_value() {
        let body = r#"{"result":"pending"}"#;
        assert_eq!(
            decode_pair(200, body).unwrap_err(),
            FetchError::Decode(DecodeError::UnexpectedResult("pending".into()))
        );

        let body = r#"{"result":true}"#;
        assert!(matches!(
            decode_pair(200, body),
            Err(FetchError::Decode(DecodeError::UnexpectedResult(_)))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_latest(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode(DecodeError::Json { status: 502, .. })
        ));
    }

    #[test]
    fn test_success_with_wrong_shape() {
        let body = r#"{"result":"success","base_code":"USD"}"#;
        assert!(matches!(
            decode_pair(200, body),
            Err(FetchError::Decode(DecodeError::Shape(_)))
        ));
    }

    #[test]
    fn test_decode_dispatches_on_kind() {
        let body = r#"{"result":"success","base_code":"GBP","target_code":"JPY","conversion_rate":190.12}"#;
        let result = decode(EndpointKind::Enriched, 200, body).unwrap();
        assert_eq!(result.kind(), EndpointKind::Enriched);
        assert_eq!(result.base_code(), "GBP");

        let result = decode(EndpointKind::Latest, 200, LATEST_USD).unwrap();
        assert!(matches!(result, RateResult::Latest(_)));
    }
}
