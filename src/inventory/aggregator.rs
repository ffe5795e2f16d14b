//! Inventory aggregator
//!
//! Fans out one fetch task per inventory entry and folds their results into a
//! [`ResultSet`] keyed by uid. Tasks report over a single channel drained by
//! the aggregator, and every report is tagged with the generation of the
//! inventory list that started it. Changing the list bumps the generation,
//! aborts in-flight tasks, and ignores anything they already sent.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

use crate::kube::{ClusterApi, InventoryEntry};

use super::fetcher::{FetchFailure, ResourceFetcher};
use super::resolved::ResolvedResource;

/// Identifies one resolution pass
pub type Generation = u64;

/// Resolution state of a single inventory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Resolved { uid: String },
    /// Id did not carry a name and kind
    Malformed,
    /// The object, or the CRD for its kind, does not exist
    NotFound { reason: String },
    /// The API call failed or timed out
    Failed { message: String },
}

impl EntryStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, EntryStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Resolved { .. } => "resolved",
            EntryStatus::Malformed => "malformed",
            EntryStatus::NotFound { .. } => "not-found",
            EntryStatus::Failed { .. } => "error",
        }
    }
}

impl From<&FetchFailure> for EntryStatus {
    fn from(failure: &FetchFailure) -> Self {
        match failure {
            FetchFailure::Malformed => EntryStatus::Malformed,
            FetchFailure::CrdNotFound { .. } | FetchFailure::NotFound { .. } => {
                EntryStatus::NotFound {
                    reason: failure.to_string(),
                }
            }
            FetchFailure::Api(err) => EntryStatus::Failed {
                message: err.to_string(),
            },
        }
    }
}

/// One finished fetch, as sent by a task
#[derive(Debug)]
pub struct Delivery {
    pub generation: Generation,
    /// Position of the entry in the inventory list
    pub index: usize,
    pub outcome: Result<ResolvedResource, FetchFailure>,
}

/// Append-only set of resolved resources, unique by uid
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    items: Vec<ResolvedResource>,
    uids: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource unless one with the same uid is already present
    ///
    /// Returns true if the set grew.
    pub fn merge(&mut self, resource: ResolvedResource) -> bool {
        if !self.uids.insert(resource.uid().to_string()) {
            return false;
        }
        self.items.push(resource);
        true
    }

    /// Resources in arrival order
    pub fn items(&self) -> &[ResolvedResource] {
        &self.items
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.uids.contains(uid)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.uids.clear();
    }
}

/// Counts of entries per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub pending: usize,
    pub resolved: usize,
    pub malformed: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// Resolves an inventory list into a deduplicated resource set
pub struct InventoryAggregator<A: ClusterApi + ?Sized + 'static> {
    fetcher: Arc<ResourceFetcher<A>>,
    limit: Option<Arc<Semaphore>>,
    generation: Generation,
    inventory: Vec<InventoryEntry>,
    statuses: Vec<EntryStatus>,
    results: ResultSet,
    tasks: Vec<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl<A: ClusterApi + ?Sized + 'static> InventoryAggregator<A> {
    pub fn new(fetcher: ResourceFetcher<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher: Arc::new(fetcher),
            limit: None,
            generation: 0,
            inventory: Vec::new(),
            statuses: Vec::new(),
            results: ResultSet::new(),
            tasks: Vec::new(),
            tx,
            rx,
        }
    }

    /// Allow at most `max` fetches in flight; 0 means unbounded
    pub fn with_concurrency_limit(mut self, max: usize) -> Self {
        self.limit = (max > 0).then(|| Arc::new(Semaphore::new(max)));
        self
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start resolving a new inventory list
    ///
    /// A list equal to the current one is a no-op. Otherwise results are
    /// cleared, the previous pass is aborted, and every entry is fetched
    /// concurrently. Must be called from within a tokio runtime.
    pub fn set_inventory(&mut self, entries: Vec<InventoryEntry>) -> Generation {
        if self.generation > 0 && entries == self.inventory {
            tracing::debug!("Inventory unchanged, keeping generation {}", self.generation);
            return self.generation;
        }

        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.generation += 1;
        self.results.clear();
        self.statuses = vec![EntryStatus::Pending; entries.len()];
        self.inventory = entries;

        tracing::debug!(
            "Resolving {} inventory entries (generation {})",
            self.inventory.len(),
            self.generation
        );

        for (index, entry) in self.inventory.iter().enumerate() {
            let parsed = entry.parse();
            if parsed.target().is_none() {
                tracing::warn!("Skipping malformed inventory id {:?}", entry.id);
                self.statuses[index] = EntryStatus::Malformed;
                continue;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let limit = self.limit.clone();
            let tx = self.tx.clone();
            let generation = self.generation;

            self.tasks.push(tokio::spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = fetcher.fetch(&parsed).await;
                // Only fails once the aggregator is gone
                let _ = tx.send(Delivery {
                    generation,
                    index,
                    outcome,
                });
            }));
        }

        self.generation
    }

    /// Fold one delivery into the current state
    ///
    /// Deliveries from a superseded generation are dropped. Returns true if
    /// the status or result set changed.
    pub fn apply(&mut self, delivery: Delivery) -> bool {
        if delivery.generation != self.generation {
            tracing::debug!(
                "Discarding stale result from generation {} (current {})",
                delivery.generation,
                self.generation
            );
            return false;
        }
        let Some(entry) = self.inventory.get(delivery.index) else {
            return false;
        };

        let status = match delivery.outcome {
            Ok(resource) => {
                let status = EntryStatus::Resolved {
                    uid: resource.uid().to_string(),
                };
                let grew = self.results.merge(resource);
                let changed = self.statuses[delivery.index] != status;
                self.statuses[delivery.index] = status;
                return grew || changed;
            }
            Err(failure) => {
                tracing::warn!("Could not resolve inventory entry {}: {}", entry.id, failure);
                EntryStatus::from(&failure)
            }
        };

        let changed = self.statuses[delivery.index] != status;
        self.statuses[delivery.index] = status;
        changed
    }

    /// Wait for the next delivery of the current pass and apply it
    ///
    /// Returns false once nothing is pending.
    pub async fn next_update(&mut self) -> bool {
        while self.pending() > 0 {
            let Some(delivery) = self.rx.recv().await else {
                return false;
            };
            let current = delivery.generation == self.generation;
            self.apply(delivery);
            if current {
                return true;
            }
        }
        false
    }

    /// Drain deliveries until every entry of the current pass has settled
    pub async fn settle(&mut self) {
        while self.next_update().await {}
    }

    /// Resolved resources in arrival order
    pub fn resources(&self) -> &[ResolvedResource] {
        self.results.items()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Entries paired with their status, in inventory order
    pub fn statuses(&self) -> impl Iterator<Item = (&InventoryEntry, &EntryStatus)> {
        self.inventory.iter().zip(self.statuses.iter())
    }

    pub fn pending(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_pending()).count()
    }

    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for status in &self.statuses {
            match status {
                EntryStatus::Pending => summary.pending += 1,
                EntryStatus::Resolved { .. } => summary.resolved += 1,
                EntryStatus::Malformed => summary.malformed += 1,
                EntryStatus::NotFound { .. } => summary.not_found += 1,
                EntryStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

impl<A: ClusterApi + ?Sized + 'static> Drop for InventoryAggregator<A> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
