//! Mapping from endpoint kind and currency arguments to a request path.
//!
//! Currency codes are passed through untouched. The service decides which
//! codes are valid, so nothing here checks length, case or alphabet.

use std::fmt;
use std::str::FromStr;

/// The three read endpoints exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Latest,
    Pair,
    Enriched,
}

impl EndpointKind {
    /// Path segment for this endpoint.
    pub fn segment(&self) -> &'static str {
        match self {
            EndpointKind::Latest => "latest",
            EndpointKind::Pair => "pair",
            EndpointKind::Enriched => "enriched",
        }
    }

    /// Number of currency arguments the endpoint takes.
    pub fn arity(&self) -> usize {
        match self {
            EndpointKind::Latest => 1,
            EndpointKind::Pair | EndpointKind::Enriched => 2,
        }
    }

    pub fn all() -> &'static [EndpointKind] {
        &[
            EndpointKind::Latest,
            EndpointKind::Pair,
            EndpointKind::Enriched,
        ]
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for EndpointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(EndpointKind::Latest),
            "pair" => Ok(EndpointKind::Pair),
            "enriched" => Ok(EndpointKind::Enriched),
            _ => Err(format!("Unknown endpoint: {}", s)),
        }
    }
}

/// A fully specified endpoint call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Latest { base: String },
    Pair { base: String, target: String },
    Enriched { base: String, target: String },
}

impl Endpoint {
    pub fn latest(base: impl Into<String>) -> Self {
        Endpoint::Latest { base: base.into() }
    }

    pub fn pair(base: impl Into<String>, target: impl Into<String>) -> Self {
        Endpoint::Pair {
            base: base.into(),
            target: target.into(),
        }
    }

    pub fn enriched(base: impl Into<String>, target: impl Into<String>) -> Self {
        Endpoint::Enriched {
            base: base.into(),
            target: target.into(),
        }
    }

    /// Builds an endpoint from a kind and its positional currency arguments.
    ///
    /// # Panics
    ///
    /// Panics if `args.len()` does not match [`EndpointKind::arity`]. A wrong
    /// argument count is a bug in the caller, not a service condition.
    pub fn from_args(kind: EndpointKind, args: &[&str]) -> Self {
        assert_eq!(
            args.len(),
            kind.arity(),
            "{} endpoint takes {} currency argument(s), got {}",
            kind,
            kind.arity(),
            args.len()
        );
        match kind {
            EndpointKind::Latest => Endpoint::latest(args[0]),
            EndpointKind::Pair => Endpoint::pair(args[0], args[1]),
            EndpointKind::Enriched => Endpoint::enriched(args[0], args[1]),
        }
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Endpoint::Latest { .. } => EndpointKind::Latest,
            Endpoint::Pair { .. } => EndpointKind::Pair,
            Endpoint::Enriched { .. } => EndpointKind::Enriched,
        }
    }

    /// Request path relative to the service base address.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Latest { base } => format!("{}/{}", self.kind(), base),
            Endpoint::Pair { base, target } | Endpoint::Enriched { base, target } => {
                format!("{}/{}/{}", self.kind(), base, target)
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Builds the request path for `kind` with the given currency arguments.
///
/// # Panics
///
/// Panics on a wrong argument count, see [`Endpoint::from_args`].
pub fn build_path(kind: EndpointKind, args: &[&str]) -> String {
    Endpoint::from_args(kind, args).path()
}
