//! flux-inventory library
//!
//! Inventory resolution for Flux objects: parsing the compact inventory ids a
//! Flux applier stores, classifying kinds, discovering CRDs, and fetching the
//! managed objects concurrently. The binary is a thin CLI over this crate.

pub mod config;
pub mod inventory;
pub mod kube;
pub mod models;
pub mod present;

// Re-export commonly used types for convenience
pub use inventory::{
    CrdCache, EntryStatus, InventoryAggregator, ResolvedResource, ResourceFetcher,
    resolve_inventory,
};
pub use kube::{ClusterApi, InventoryEntry, KubeClusterApi, ParsedIdentifier, parse_id};
pub use models::{FluxResourceKind, plural_of};
