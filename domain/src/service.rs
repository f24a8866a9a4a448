use tracing::{debug, info};

use crate::validate::Validator;
use crate::{CoreError, HostResolver, ShortId, UrlEntry, UrlRegistry};

/// Application service orchestrating creation and resolution of short links.
///
/// It is generic over the registry and the host resolver so tests can swap
/// in deterministic fakes. The registry is owned here and shared by wrapping
/// the whole service in an `Arc`.
pub struct ShortenerService<R: UrlRegistry, H: HostResolver> {
    registry: R,
    validator: Validator<H>,
}

impl<R: UrlRegistry, H: HostResolver> ShortenerService<R, H> {
    pub fn new(registry: R, resolver: H) -> Self {
        Self {
            registry,
            validator: Validator::new(resolver),
        }
    }

    /// Validate `candidate` and register its canonical form.
    ///
    /// The DNS check runs before any registry lock is taken.
    pub async fn shorten(&self, candidate: &str) -> Result<UrlEntry, CoreError> {
        let canonical = self.validator.validate(candidate).await?;
        let entry = self.registry.register(&canonical)?;
        info!(short_url = %entry.short_id, original_url = %entry.original_url, "shortened");
        Ok(entry)
    }

    /// Resolve a raw path segment to its stored entry.
    pub fn resolve(&self, raw_id: &str) -> Result<UrlEntry, CoreError> {
        let id = ShortId::parse(raw_id)?;
        match self.registry.resolve(id)? {
            Some(entry) => Ok(entry),
            None => {
                debug!(short_url = %id, "no entry");
                Err(CoreError::NotFound)
            }
        }
    }

    /// All entries in registration order.
    pub fn list(&self) -> Result<Vec<UrlEntry>, CoreError> {
        self.registry.list_all()
    }
}
