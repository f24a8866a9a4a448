//! Domain library for the URL Shortener.
//!
//! Holds the domain types, ports (traits), and error definitions. External
//! crates are limited to `url` for canonical parsing, `thiserror`, and
//! `tracing`.
//! Keep HTTP and runtime concerns out of this crate: DNS lookups reach the
//! domain through the [`HostResolver`] port.

use std::fmt::{Display, Formatter};
use std::future::Future;

/// Positive integer handle returned to callers in place of the original URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortId(u64);

impl ShortId {
    /// Wrap a raw id; zero is not a valid identifier.
    pub fn new(id: u64) -> Result<Self, CoreError> {
        if id == 0 {
            return Err(CoreError::InvalidIdentifier("must be positive".into()));
        }
        Ok(Self(id))
    }

    /// Parse a path segment into an identifier.
    ///
    /// Only plain decimal digits are accepted. Whitespace, signs, fractions,
    /// zero and values beyond `u64` are rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::InvalidIdentifier("empty".into()));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidIdentifier(format!("not a number: {:?}", raw)));
        }
        let id = raw
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidIdentifier("out of range".into()))?;
        Self::new(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for ShortId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored mapping between a canonical URL and its short identifier.
///
/// Entries are born fully valid and never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlEntry {
    pub original_url: String,
    pub short_id: ShortId,
}

impl UrlEntry {
    pub fn new(original_url: String, short_id: ShortId) -> Self {
        Self {
            original_url,
            short_id,
        }
    }
}

/// Registry port: append-only mapping from canonical URL to short identifier.
pub trait UrlRegistry: Send + Sync {
    /// Return the existing entry for `canonical_url`, or allocate the next id
    /// and store a new one. Lookup and insert happen as one atomic step.
    fn register(&self, canonical_url: &str) -> Result<UrlEntry, CoreError>;
    fn resolve(&self, id: ShortId) -> Result<Option<UrlEntry>, CoreError>;
    /// All entries in registration order.
    fn list_all(&self) -> Result<Vec<UrlEntry>, CoreError>;
}

/// Name resolution port used as a reachability check for submitted URLs.
///
/// Implementations should bound the lookup in time and report any failure,
/// including a timeout, as [`CoreError::UnresolvableHost`].
pub trait HostResolver: Send + Sync {
    fn resolve(&self, host: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Core domain errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("unresolvable host: {0}")]
    UnresolvableHost(String),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("not found")]
    NotFound,
    #[error("repository error: {0}")]
    Repository(String),
}

impl CoreError {
    /// True for failures raised while validating a submitted URL.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedUrl(_)
                | CoreError::UnsupportedScheme(_)
                | CoreError::UnresolvableHost(_)
        )
    }
}

pub mod adapters;
pub mod service;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_parse_accepts_positive_integers() {
        assert_eq!(ShortId::parse("1").unwrap().get(), 1);
        assert_eq!(ShortId::parse("42").unwrap().get(), 42);
        assert_eq!(ShortId::parse("9999").unwrap().to_string(), "9999");
    }

    #[test]
    fn short_id_parse_rejects_garbage() {
        for raw in [
            "",
            "abc",
            "12abc",
            "-1",
            "+3",
            "1.5",
            "0",
            "99999999999999999999999",
            " 42",
            "42 ",
            "\t7",
        ] {
            let err = ShortId::parse(raw).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidIdentifier(_)),
                "expected InvalidIdentifier for {raw:?}"
            );
        }
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(CoreError::MalformedUrl("x".into()).is_validation());
        assert!(CoreError::UnsupportedScheme("ftp".into()).is_validation());
        assert!(CoreError::UnresolvableHost("h".into()).is_validation());
        assert!(!CoreError::NotFound.is_validation());
        assert!(!CoreError::InvalidIdentifier("x".into()).is_validation());
    }
}
