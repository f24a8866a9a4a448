//! Validation of submitted URLs: syntax, scheme restriction, and a
//! reachability check through the [`HostResolver`] port.

use tracing::debug;
use url::{Host, Url};

use crate::{CoreError, HostResolver};

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Parse a candidate into an absolute http(s) URL without touching the
/// network.
pub fn parse_candidate(candidate: &str) -> Result<Url, CoreError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MalformedUrl("empty".into()));
    }
    let parsed = Url::parse(trimmed).map_err(|e| CoreError::MalformedUrl(e.to_string()))?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(CoreError::UnsupportedScheme(parsed.scheme().to_string()));
    }
    Ok(parsed)
}

/// Turns raw candidate strings into canonical URLs.
pub struct Validator<H: HostResolver> {
    resolver: H,
}

impl<H: HostResolver> Validator<H> {
    pub fn new(resolver: H) -> Self {
        Self { resolver }
    }

    /// Validate `candidate` and return its canonical serialized form.
    ///
    /// Domain hosts are looked up through the resolver; IP literals need no
    /// lookup. A resolver failure is returned as-is, there are no retries.
    pub async fn validate(&self, candidate: &str) -> Result<String, CoreError> {
        let parsed = parse_candidate(candidate)?;
        match parsed.host() {
            Some(Host::Domain(domain)) => {
                debug!(host = %domain, "resolving host");
                self.resolver.resolve(domain).await?;
            }
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
            None => return Err(CoreError::MalformedUrl("missing host".into())),
        }
        Ok(parsed.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Resolver that knows a fixed set of hosts and records every lookup.
    struct FakeResolver {
        known: Vec<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeResolver {
        fn new(known: &[&'static str]) -> Self {
            Self {
                known: known.to_vec(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl HostResolver for FakeResolver {
        async fn resolve(&self, host: &str) -> Result<(), CoreError> {
            self.seen.lock().unwrap().push(host.to_string());
            if self.known.iter().any(|known| *known == host) {
                Ok(())
            } else {
                Err(CoreError::UnresolvableHost(host.to_string()))
            }
        }
    }

    #[test]
    fn parse_rejects_non_absolute_strings() {
        assert!(matches!(
            parse_candidate("not a url"),
            Err(CoreError::MalformedUrl(_))
        ));
        assert!(matches!(
            parse_candidate("/relative/path"),
            Err(CoreError::MalformedUrl(_))
        ));
        assert!(matches!(parse_candidate("   "), Err(CoreError::MalformedUrl(_))));
    }

    #[test]
    fn parse_rejects_other_schemes() {
        assert_eq!(
            parse_candidate("ftp://example.com"),
            Err(CoreError::UnsupportedScheme("ftp".into()))
        );
        assert!(matches!(
            parse_candidate("mailto:someone@example.com"),
            Err(CoreError::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn validate_returns_canonical_form() {
        let v = Validator::new(FakeResolver::new(&["www.freecodecamp.org", "example.com"]));
        assert_eq!(
            v.validate("https://www.freecodecamp.org").await.unwrap(),
            "https://www.freecodecamp.org/"
        );
        assert_eq!(
            v.validate("HTTP://Example.COM:80/a b").await.unwrap(),
            "http://example.com/a%20b"
        );
    }

    #[tokio::test]
    async fn validate_reports_unresolvable_host() {
        let v = Validator::new(FakeResolver::new(&[]));
        let err = v.validate("https://no-such-host.invalid").await.unwrap_err();
        assert_eq!(err, CoreError::UnresolvableHost("no-such-host.invalid".into()));
    }

    #[tokio::test]
    async fn ip_literals_skip_the_lookup() {
        let resolver = FakeResolver::new(&[]);
        let v = Validator::new(resolver);
        assert_eq!(
            v.validate("http://127.0.0.1:8080/x").await.unwrap(),
            "http://127.0.0.1:8080/x"
        );
        assert_eq!(v.validate("http://[::1]/").await.unwrap(), "http://[::1]/");
        assert!(v.resolver.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scheme_is_checked_before_lookup() {
        let v = Validator::new(FakeResolver::new(&["example.com"]));
        let err = v.validate("ftp://example.com").await.unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedScheme(_)));
        assert!(v.resolver.seen.lock().unwrap().is_empty());
    }
}
