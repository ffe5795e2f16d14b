//! Inventory extraction for Flux resources
//!
//! Flux appliers persist the objects they manage in
//! `status.inventory.entries[]` as compact `{id, v}` records. The id is
//! `<namespace>_<name>_<group>_<Kind>`, with an empty namespace for
//! cluster-scoped objects and an empty group for the core API group.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::ObjectTarget;

/// A resource entry from inventory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: String,
    #[serde(rename = "v", default)]
    pub version: String,
}

impl InventoryEntry {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Decode this entry's id
    pub fn parse(&self) -> ParsedIdentifier {
        parse_id(&self.id)
    }
}

/// Structured form of an inventory id
///
/// Segments missing from a malformed id are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParsedIdentifier {
    pub namespace: Option<String>,
    pub name: Option<String>,
    pub group: Option<String>,
    pub kind: Option<String>,
}

impl ParsedIdentifier {
    /// Object to fetch, or `None` if name or kind is missing
    pub fn target(&self) -> Option<ObjectTarget> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        self.kind.as_deref().filter(|k| !k.is_empty())?;
        Some(ObjectTarget::new(name, self.namespace.clone()))
    }

    /// API group, empty for the core group
    pub fn group_or_core(&self) -> &str {
        self.group.as_deref().unwrap_or("")
    }
}

/// Split an inventory id into its four segments
///
/// Never fails: extra segments are ignored and missing ones come back as `None`.
pub fn parse_id(id: &str) -> ParsedIdentifier {
    let mut parts = id.split('_').map(str::to_string);
    let namespace = parts.next().filter(|ns| !ns.is_empty());

    ParsedIdentifier {
        namespace,
        name: parts.next(),
        group: parts.next(),
        kind: parts.next(),
    }
}

/// Extract inventory from a resource's status field
///
/// Reads `status.inventory.entries[]`. Entries without a string `id` are
/// dropped with a warning.
pub fn extract_inventory(obj: &Value) -> Vec<InventoryEntry> {
    let Some(inventory_entries) = obj
        .get("status")
        .and_then(|s| s.get("inventory"))
        .and_then(|i| i.get("entries"))
        .and_then(|e| e.as_array())
    else {
        tracing::debug!("No inventory field found in resource status");
        return Vec::new();
    };

    tracing::debug!(
        "Found status.inventory.entries with {} items",
        inventory_entries.len()
    );

    inventory_entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let parsed = entry.get("id").and_then(|i| i.as_str()).map(|id| {
                let version = entry.get("v").and_then(|v| v.as_str()).unwrap_or_default();
                InventoryEntry::new(id, version)
            });
            if parsed.is_none() {
                tracing::warn!("Failed to parse inventory entry {}: {:?}", idx, entry);
            }
            parsed
        })
        .collect()
}
