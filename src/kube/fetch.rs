//! Resource fetching utilities
//!
//! Direct fetches of Flux objects and their events for the CLI views.
//! Objects are returned as JSON so the presentation layer can read any field.

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Event;
use kube::Api;
use kube::api::ListParams;
use kube::core::DynamicObject;
use serde_json::Value;

use crate::models::FluxResourceKind;

/// Fetch a single Flux object
pub async fn fetch_flux_object(
    client: &kube::Client,
    kind: FluxResourceKind,
    namespace: &str,
    name: &str,
) -> Result<Value> {
    let api: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), namespace, &kind.api_resource());
    let obj = api
        .get(name)
        .await
        .with_context(|| format!("Failed to fetch {} {}/{}", kind, namespace, name))?;
    serde_json::to_value(&obj).context("Failed to serialize object to JSON")
}

/// List Flux objects of one kind, in a namespace or across all of them
pub async fn list_flux_objects(
    client: &kube::Client,
    kind: FluxResourceKind,
    namespace: Option<&str>,
) -> Result<Vec<Value>> {
    let ar = kind.api_resource();
    let api: Api<DynamicObject> = match namespace {
        Some(ns) => Api::namespaced_with(client.clone(), ns, &ar),
        None => Api::all_with(client.clone(), &ar),
    };
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list {}", kind))?;

    list.items
        .iter()
        .map(|obj| serde_json::to_value(obj).context("Failed to serialize object to JSON"))
        .collect()
}

/// Events whose involved object is the given Flux object
pub async fn fetch_events(
    client: &kube::Client,
    kind: FluxResourceKind,
    namespace: &str,
    name: &str,
) -> Result<Vec<Value>> {
    let api: Api<Event> = Api::namespaced(client.clone(), namespace);
    let selector = involved_object_selector(kind.as_str(), name);
    let list = api
        .list(&ListParams::default().fields(&selector))
        .await
        .with_context(|| format!("Failed to list events for {} {}/{}", kind, namespace, name))?;

    tracing::debug!("Fetched {} events with selector {}", list.items.len(), selector);
    list.items
        .iter()
        .map(|event| serde_json::to_value(event).context("Failed to serialize event to JSON"))
        .collect()
}

fn involved_object_selector(kind: &str, name: &str) -> String {
    format!("involvedObject.kind={},involvedObject.name={}", kind, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involved_object_selector() {
        assert_eq!(
            involved_object_selector("Kustomization", "apps"),
            "involvedObject.kind=Kustomization,involvedObject.name=apps"
        );
    }
}
