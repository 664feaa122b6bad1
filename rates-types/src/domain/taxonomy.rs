//! Business-error tags reported by the service in the `error-type` field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Error kinds the service reports in the body of a `result: "error"` response.
///
/// Tags round-trip exactly: `ErrorKind::parse(kind.as_str()) == kind`.
/// Tags the service has not documented are kept verbatim in [`ErrorKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedCode,
    MalformedRequest,
    InvalidKey,
    InactiveAccount,
    QuotaReached,
    IncorrectHttpMethod,
    PlanUpgradeRequired,
    Unknown(String),
}

impl ErrorKind {
    /// Every documented error kind.
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::UnsupportedCode,
        ErrorKind::MalformedRequest,
        ErrorKind::InvalidKey,
        ErrorKind::InactiveAccount,
        ErrorKind::QuotaReached,
        ErrorKind::IncorrectHttpMethod,
        ErrorKind::PlanUpgradeRequired,
    ];

    /// Maps a raw `error-type` value onto a kind. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "unsupported-code" => ErrorKind::UnsupportedCode,
            "malformed-request" => ErrorKind::MalformedRequest,
            "invalid-key" => ErrorKind::InvalidKey,
            "inactive-account" => ErrorKind::InactiveAccount,
            "quota-reached" => ErrorKind::QuotaReached,
            "incorrect-http-method" => ErrorKind::IncorrectHttpMethod,
            "plan-upgrade-required" => ErrorKind::PlanUpgradeRequired,
            other => ErrorKind::Unknown(other.to_string()),
        }
    }

    /// Returns the wire tag exactly as the service sends it.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::UnsupportedCode => "unsupported-code",
            ErrorKind::MalformedRequest => "malformed-request",
            ErrorKind::InvalidKey => "invalid-key",
            ErrorKind::InactiveAccount => "inactive-account",
            ErrorKind::QuotaReached => "quota-reached",
            ErrorKind::IncorrectHttpMethod => "incorrect-http-method",
            ErrorKind::PlanUpgradeRequired => "plan-upgrade-required",
            ErrorKind::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ErrorKind::Unknown(_))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ErrorKind::parse(s))
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorKind::parse(&raw))
    }
}
