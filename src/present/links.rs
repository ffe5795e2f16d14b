//! Cross-resource links
//!
//! Resolves which source a Kustomization or HelmRelease points at, and builds
//! route links for inventory objects.

use serde_json::Value;

use crate::inventory::ResolvedResource;
use crate::models::{FluxResourceKind, plural_of};

/// Route a resource links to, by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Kustomizations,
    HelmRelease,
    Source,
    Bucket,
    Crd,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Kustomizations => "kustomizations",
            Route::HelmRelease => "helmrelease",
            Route::Source => "source",
            Route::Bucket => "bucket",
            Route::Crd => "crd",
        }
    }
}

/// Route for a kind; anything without a dedicated view is a generic custom resource
pub fn route_for(kind: &str) -> Route {
    match FluxResourceKind::parse_optional(kind) {
        Some(FluxResourceKind::Kustomization) => Route::Kustomizations,
        Some(FluxResourceKind::HelmRelease) => Route::HelmRelease,
        Some(
            FluxResourceKind::GitRepository
            | FluxResourceKind::OCIRepository
            | FluxResourceKind::HelmRepository,
        ) => Route::Source,
        Some(FluxResourceKind::Bucket) => Route::Bucket,
        _ => Route::Crd,
    }
}

/// Source type segment for a source kind, e.g. `gitrepositories`
pub fn source_type(kind: &str) -> Option<&'static str> {
    match FluxResourceKind::parse_optional(kind)? {
        FluxResourceKind::GitRepository => Some("gitrepositories"),
        FluxResourceKind::OCIRepository => Some("ocirepositories"),
        FluxResourceKind::Bucket => Some("buckets"),
        FluxResourceKind::HelmRepository => Some("helmrepositories"),
        FluxResourceKind::HelmChart => Some("helmcharts"),
        FluxResourceKind::Kustomization | FluxResourceKind::HelmRelease => None,
    }
}

/// The source an object is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub name: String,
    /// Plural source type, e.g. `gitrepositories`
    pub source_type: String,
    pub namespace: Option<String>,
}

impl SourceRef {
    /// `type/name`, prefixed with the namespace when it differs from `current`
    pub fn display(&self, current: Option<&str>) -> String {
        match self.namespace.as_deref() {
            Some(ns) if Some(ns) != current => {
                format!("{}/{}/{}", self.source_type, ns, self.name)
            }
            _ => format!("{}/{}", self.source_type, self.name),
        }
    }
}

/// Find the source of a Flux object
///
/// Kustomizations use `spec.sourceRef`. HelmReleases use `spec.chartRef`,
/// falling back to `spec.chart.spec.sourceRef`. A source object is its own
/// source. Returns `None` when the referenced kind is not a known source.
pub fn source_ref(obj: &Value) -> Option<SourceRef> {
    let kind = obj.get("kind").and_then(|k| k.as_str())?;
    let own_namespace = obj
        .pointer("/metadata/namespace")
        .and_then(|n| n.as_str())
        .map(str::to_string);

    let reference = match FluxResourceKind::parse_optional(kind) {
        Some(FluxResourceKind::Kustomization) => obj.pointer("/spec/sourceRef")?,
        Some(FluxResourceKind::HelmRelease) => obj
            .pointer("/spec/chartRef")
            .or_else(|| obj.pointer("/spec/chart/spec/sourceRef"))?,
        _ => {
            return Some(SourceRef {
                name: obj.pointer("/metadata/name")?.as_str()?.to_string(),
                source_type: source_type(kind)?.to_string(),
                namespace: own_namespace,
            });
        }
    };

    let ref_kind = reference.get("kind").and_then(|k| k.as_str())?;
    Some(SourceRef {
        name: reference.get("name")?.as_str()?.to_string(),
        source_type: source_type(ref_kind)?.to_string(),
        namespace: reference
            .get("namespace")
            .and_then(|n| n.as_str())
            .map(str::to_string)
            .or(own_namespace),
    })
}

/// A route plus its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub route: Route,
    pub params: Vec<(&'static str, String)>,
    pub label: String,
}

impl Link {
    /// Path form: `/{route}/{param}/...`, skipping empty params
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.route.name());
        for (_, value) in &self.params {
            if !value.is_empty() {
                path.push('/');
                path.push_str(value);
            }
        }
        path
    }
}

/// Link for an inventory object
///
/// Built-in objects have no plugin route and get `None`.
pub fn resource_link(resource: &ResolvedResource) -> Option<Link> {
    if resource.builtin {
        return None;
    }

    let kind = resource.display_kind();
    let route = route_for(kind);
    let name = resource.metadata.name.clone();
    let namespace = resource
        .metadata
        .namespace
        .clone()
        .or_else(|| {
            resource
                .json_data
                .pointer("/metadata/namespace")
                .and_then(|n| n.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let params = match route {
        Route::Crd => {
            let api_name = resource
                .json_data
                .get("apiName")
                .and_then(|a| a.as_str())
                .unwrap_or(&resource.api_name);
            vec![
                ("crd", format!("{}.{}", plural_of(kind), api_name)),
                ("namespace", namespace),
                ("crName", name.clone()),
            ]
        }
        _ => vec![
            ("type", plural_of(kind)),
            ("namespace", namespace),
            ("name", name.clone()),
        ],
    };

    Some(Link {
        route,
        params,
        label: name,
    })
}
