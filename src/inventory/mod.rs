//! Inventory resolution
//!
//! Turns the compact inventory a Flux applier stores on its status into the
//! live objects it manages.
//!
//! - [`CrdCache`] memoizes CRD discovery per `(group, kind)`
//! - [`ResourceFetcher`] resolves one entry, built-in or custom
//! - [`InventoryAggregator`] resolves a whole list concurrently and dedupes by uid

mod aggregator;
mod crd_cache;
mod fetcher;
mod resolved;

pub use aggregator::{
    Delivery, EntryStatus, Generation, InventoryAggregator, ResultSet, StatusSummary,
};
pub use crd_cache::{CrdCache, crd_name};
pub use fetcher::{FetchFailure, ResourceFetcher};
pub use resolved::{ResolvedResource, ResourceMeta, creation_timestamp, is_ready};

use std::sync::Arc;

use crate::kube::{ClusterApi, InventoryEntry};

/// Resolve an inventory list in one shot and wait for every entry
pub async fn resolve_inventory<A>(
    api: Arc<A>,
    crds: Arc<CrdCache>,
    entries: Vec<InventoryEntry>,
) -> InventoryAggregator<A>
where
    A: ClusterApi + ?Sized + 'static,
{
    let mut aggregator = InventoryAggregator::new(ResourceFetcher::new(api, crds));
    aggregator.set_inventory(entries);
    aggregator.settle().await;
    aggregator
}
