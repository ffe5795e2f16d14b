//! Flux Resource Kind definitions
//!
//! Centralized enum for the Flux kinds this crate has views for: the
//! Kustomization and HelmRelease appliers, and the source kinds they point at.

use std::fmt;
use std::str::FromStr;

use kube::core::{ApiResource, GroupVersionKind};

use super::plural::plural_of;

/// Enumeration of the Flux resource kinds with dedicated views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluxResourceKind {
    // Source Controller resources
    GitRepository,
    OCIRepository,
    HelmRepository,
    Bucket,
    HelmChart,
    // Kustomize Controller resources
    Kustomization,
    // Helm Controller resources
    HelmRelease,
}

impl FluxResourceKind {
    /// Get the display name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FluxResourceKind::GitRepository => "GitRepository",
            FluxResourceKind::OCIRepository => "OCIRepository",
            FluxResourceKind::HelmRepository => "HelmRepository",
            FluxResourceKind::Bucket => "Bucket",
            FluxResourceKind::HelmChart => "HelmChart",
            FluxResourceKind::Kustomization => "Kustomization",
            FluxResourceKind::HelmRelease => "HelmRelease",
        }
    }

    /// Try to parse a string into a FluxResourceKind, returning None if invalid
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Get all Flux resource kinds
    pub fn all() -> &'static [Self] {
        &[
            FluxResourceKind::GitRepository,
            FluxResourceKind::OCIRepository,
            FluxResourceKind::HelmRepository,
            FluxResourceKind::Bucket,
            FluxResourceKind::HelmChart,
            FluxResourceKind::Kustomization,
            FluxResourceKind::HelmRelease,
        ]
    }

    /// API group served by the owning controller
    pub fn api_group(&self) -> &'static str {
        match self {
            FluxResourceKind::Kustomization => "kustomize.toolkit.fluxcd.io",
            FluxResourceKind::HelmRelease => "helm.toolkit.fluxcd.io",
            _ => "source.toolkit.fluxcd.io",
        }
    }

    /// Preferred API version
    pub fn api_version(&self) -> &'static str {
        match self {
            FluxResourceKind::HelmRelease => "v2",
            _ => "v1",
        }
    }

    /// Dynamic API resource for fetching objects of this kind
    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(self.api_group(), self.api_version(), self.as_str());
        ApiResource::from_gvk_with_plural(&gvk, &plural_of(self.as_str()))
    }

    /// Try to parse a string (case-insensitive, with common aliases)
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gitrepository" | "gitrepo" | "gitrepositories" => {
                Some(FluxResourceKind::GitRepository)
            }
            "ocirepository" | "oci" | "ocirepositories" => Some(FluxResourceKind::OCIRepository),
            "helmrepository" | "helmrepo" | "helmrepositories" => {
                Some(FluxResourceKind::HelmRepository)
            }
            "bucket" | "buckets" => Some(FluxResourceKind::Bucket),
            "helmchart" | "helmcharts" => Some(FluxResourceKind::HelmChart),
            "kustomization" | "ks" | "kustomizations" => Some(FluxResourceKind::Kustomization),
            "helmrelease" | "hr" | "helmreleases" => Some(FluxResourceKind::HelmRelease),
            _ => None,
        }
    }
}

impl fmt::Display for FluxResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<FluxResourceKind> for String {
    fn from(kind: FluxResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for FluxResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FluxResourceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown Flux resource kind: {}", s))
    }
}
