use std::collections::HashMap;
use std::sync::RwLock;

use crate::{CoreError, ShortId, UrlEntry, UrlRegistry};

/// Process-lifetime in-memory registry.
///
/// Both indexes live behind a single `RwLock` so `register` can check and
/// insert under one write guard. Ids are dense from 1, so the reverse index
/// is a plain vector addressed by `id - 1`.
pub struct InMemoryRegistry {
    inner: RwLock<Indexes>,
}

#[derive(Default)]
struct Indexes {
    by_url: HashMap<String, ShortId>,
    by_id: Vec<UrlEntry>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Indexes::default()),
        }
    }

    pub fn len(&self) -> Result<usize, CoreError> {
        let idx = self
            .inner
            .read()
            .map_err(|_| CoreError::Repository("rwlock poisoned".into()))?;
        Ok(idx.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexes {
    fn entry(&self, id: ShortId) -> Option<&UrlEntry> {
        let slot = usize::try_from(id.get() - 1).ok()?;
        self.by_id.get(slot)
    }
}

impl UrlRegistry for InMemoryRegistry {
    fn register(&self, canonical_url: &str) -> Result<UrlEntry, CoreError> {
        let mut idx = self
            .inner
            .write()
            .map_err(|_| CoreError::Repository("rwlock poisoned".into()))?;

        if let Some(&id) = idx.by_url.get(canonical_url) {
            return idx
                .entry(id)
                .cloned()
                .ok_or_else(|| CoreError::Repository(format!("index out of sync for id {}", id)));
        }

        let next = u64::try_from(idx.by_id.len() + 1)
            .map_err(|_| CoreError::Repository("identifier space exhausted".into()))?;
        let entry = UrlEntry::new(canonical_url.to_string(), ShortId::new(next)?);
        idx.by_url.insert(entry.original_url.clone(), entry.short_id);
        idx.by_id.push(entry.clone());
        Ok(entry)
    }

    fn resolve(&self, id: ShortId) -> Result<Option<UrlEntry>, CoreError> {
        let idx = self
            .inner
            .read()
            .map_err(|_| CoreError::Repository("rwlock poisoned".into()))?;
        Ok(idx.entry(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<UrlEntry>, CoreError> {
        let idx = self
            .inner
            .read()
            .map_err(|_| CoreError::Repository("rwlock poisoned".into()))?;
        Ok(idx.by_id.clone())
    }
}
