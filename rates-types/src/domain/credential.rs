//! Bearer credential sent with every request.

use rand::Rng;
use std::fmt;

/// Opaque bearer token. Immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// A random token the service will not recognise, for provoking `invalid-key`.
    pub fn garbled() -> Self {
        let n: u32 = rand::rng().random_range(1..100_000_000);
        Self(format!("InvalidBearer{}", n))
    }

    /// The raw token. Only transports should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let cred = Credential::new("abc123");
        assert_eq!(cred.bearer_header(), "Bearer abc123");
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new("super-secret");
        assert!(!format!("{:?}", cred).contains("super-secret"));
    }

    #[test]
    fn test_garbled_shape() {
        let cred = Credential::garbled();
        let suffix = cred.expose().strip_prefix("InvalidBearer").unwrap();
        let n: u32 = suffix.parse().unwrap();
        assert!((1..100_000_000).contains(&n));
    }
}
