//! System DNS adapter for the domain's `HostResolver` port.

use std::time::Duration;

use domain::{CoreError, HostResolver};
use tracing::warn;

/// Resolves hostnames through the OS resolver (`tokio::net::lookup_host`),
/// bounded by a timeout.
#[derive(Clone, Debug)]
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str) -> Result<(), CoreError> {
        // Port is irrelevant for name resolution; lookup_host requires one.
        let lookup = tokio::net::lookup_host((host, 0));
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(mut addrs)) => {
                if addrs.next().is_some() {
                    Ok(())
                } else {
                    warn!(%host, "dns lookup returned no addresses");
                    Err(CoreError::UnresolvableHost(host.to_string()))
                }
            }
            Ok(Err(e)) => {
                warn!(%host, err = %e, "dns lookup failed");
                Err(CoreError::UnresolvableHost(host.to_string()))
            }
            Err(_) => {
                warn!(%host, timeout_ms = self.timeout.as_millis() as u64, "dns lookup timed out");
                Err(CoreError::UnresolvableHost(host.to_string()))
            }
        }
    }
}
