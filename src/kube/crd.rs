//! CustomResourceDefinition descriptors
//!
//! A [`CrdDescriptor`] is the subset of a CRD needed to build a dynamic
//! accessor for instances of the custom resource.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::{ApiResource, GroupVersionKind};

/// Resolved description of a custom resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrdDescriptor {
    /// Fully qualified CRD name (`{plural}.{group}`)
    pub name: String,
    pub group: String,
    pub kind: String,
    pub plural: String,
    pub namespaced: bool,
    /// Storage version, or the first served version when none is marked
    pub version: String,
}

impl CrdDescriptor {
    /// Build a descriptor from a CRD object
    ///
    /// Returns `None` when the CRD serves no version at all.
    pub fn from_crd(crd: &CustomResourceDefinition) -> Option<Self> {
        let spec = &crd.spec;
        let version = spec
            .versions
            .iter()
            .find(|v| v.storage)
            .or_else(|| spec.versions.iter().find(|v| v.served))?
            .name
            .clone();

        Some(Self {
            name: crd
                .metadata
                .name
                .clone()
                .unwrap_or_else(|| format!("{}.{}", spec.names.plural, spec.group)),
            group: spec.group.clone(),
            kind: spec.names.kind.clone(),
            plural: spec.names.plural.clone(),
            namespaced: spec.scope == "Namespaced",
            version,
        })
    }

    /// Dynamic accessor for instances of this custom resource
    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(&self.group, &self.version, &self.kind);
        ApiResource::from_gvk_with_plural(&gvk, &self.plural)
    }
}
