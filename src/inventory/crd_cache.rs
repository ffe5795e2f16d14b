//! CRD resolution cache
//!
//! Memoizes CRD lookups by `(group, kind)` for the lifetime of the cache.
//! Each key owns a `OnceCell`, so concurrent misses on the same key share a
//! single in-flight request. Not-found results are cached; transport errors
//! are not, and the next lookup retries.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::kube::{ApiError, ClusterApi, CrdDescriptor};
use crate::models::plural_of;

type Slot = Arc<OnceCell<Option<Arc<CrdDescriptor>>>>;

/// Cache of discovered CRD descriptors, keyed by `"{group}/{kind}"`
#[derive(Default)]
pub struct CrdCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl CrdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the CRD for a group and kind
    ///
    /// Returns the same `Arc` for every hit on a key. `Ok(None)` means the
    /// CRD is not installed.
    pub async fn resolve<A>(
        &self,
        api: &A,
        group: &str,
        kind: &str,
    ) -> Result<Option<Arc<CrdDescriptor>>, ApiError>
    where
        A: ClusterApi + ?Sized,
    {
        let key = cache_key(group, kind);
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        if let Some(hit) = slot.get() {
            tracing::trace!("CRD cache hit for {}", key);
            return Ok(hit.clone());
        }

        slot.get_or_try_init(|| fetch_descriptor(api, group, kind))
            .await
            .cloned()
    }

    /// Cached result for a key without fetching
    ///
    /// The outer `None` means the key has not been resolved yet.
    pub async fn cached(&self, group: &str, kind: &str) -> Option<Option<Arc<CrdDescriptor>>> {
        let slots = self.slots.lock().await;
        slots
            .get(&cache_key(group, kind))
            .and_then(|slot| slot.get().cloned())
    }

    /// Number of keys with a settled result
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn fetch_descriptor<A>(
    api: &A,
    group: &str,
    kind: &str,
) -> Result<Option<Arc<CrdDescriptor>>, ApiError>
where
    A: ClusterApi + ?Sized,
{
    // Core-group kinds missing from the built-in registry cannot be CRDs
    if group.is_empty() {
        tracing::debug!("No API group for kind {}, skipping CRD lookup", kind);
        return Ok(None);
    }

    let crd_name = crd_name(group, kind);
    tracing::debug!("CRD cache miss for {}/{}, fetching {}", group, kind, crd_name);
    let found = api.get_crd(&crd_name).await?;
    if found.is_none() {
        tracing::debug!("CRD {} not found", crd_name);
    }
    Ok(found.map(Arc::new))
}

fn cache_key(group: &str, kind: &str) -> String {
    format!("{}/{}", group, kind)
}

/// Fully qualified CRD name for a kind: `{plural}.{group}`
pub fn crd_name(group: &str, kind: &str) -> String {
    format!("{}.{}", plural_of(kind), group)
}
