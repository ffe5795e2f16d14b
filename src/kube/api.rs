//! Cluster API seam
//!
//! Inventory resolution talks to the cluster only through [`ClusterApi`].
//! [`KubeClusterApi`] is the real implementation over `kube::Client`; tests
//! substitute mocks or in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::Api;
use kube::core::{ApiResource, DynamicObject};
use serde_json::Value;

use super::builtin::builtin_resource;
use super::crd::CrdDescriptor;

/// Errors returned by the cluster API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Kubernetes API request failed: {0}")]
    Request(String),

    #[error("Failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<kube::Error> for ApiError {
    fn from(err: kube::Error) -> Self {
        ApiError::Request(err.to_string())
    }
}

/// A single object to fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectTarget {
    pub name: String,
    /// `None` for cluster-scoped objects
    pub namespace: Option<String>,
}

impl ObjectTarget {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }
}

/// Read access to the cluster, as needed for inventory resolution
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Built-in resource type for a kind, if the API serves it natively
    fn builtin(&self, kind: &str) -> Option<ApiResource>;

    /// Fetch one object; `Ok(None)` when it does not exist
    async fn get_object(
        &self,
        resource: &ApiResource,
        target: &ObjectTarget,
    ) -> Result<Option<Value>, ApiError>;

    /// Fetch a CRD by its fully qualified name; `Ok(None)` when not installed
    async fn get_crd(&self, crd_name: &str) -> Result<Option<CrdDescriptor>, ApiError>;
}

/// [`ClusterApi`] backed by a live Kubernetes client
#[derive(Clone)]
pub struct KubeClusterApi {
    client: kube::Client,
}

impl KubeClusterApi {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying Kubernetes client
    pub fn client(&self) -> &kube::Client {
        &self.client
    }

    fn dynamic_api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    fn builtin(&self, kind: &str) -> Option<ApiResource> {
        builtin_resource(kind)
    }

    async fn get_object(
        &self,
        resource: &ApiResource,
        target: &ObjectTarget,
    ) -> Result<Option<Value>, ApiError> {
        let api = self.dynamic_api(resource, target.namespace.as_deref());
        tracing::debug!(
            "GET {} {}/{}",
            resource.api_version,
            target.namespace.as_deref().unwrap_or("-"),
            target.name
        );

        match api.get_opt(&target.name).await? {
            Some(obj) => serde_json::to_value(&obj)
                .map(Some)
                .map_err(|e| ApiError::Decode {
                    what: format!("{} {}", resource.kind, target.name),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn get_crd(&self, crd_name: &str) -> Result<Option<CrdDescriptor>, ApiError> {
        let api: Api<CustomResourceDefinition> = Api::all(self.client.clone());
        tracing::debug!("GET CustomResourceDefinition {}", crd_name);

        let Some(crd) = api.get_opt(crd_name).await? else {
            return Ok(None);
        };
        let descriptor = CrdDescriptor::from_crd(&crd);
        if descriptor.is_none() {
            tracing::warn!("CRD {} serves no versions, treating as not found", crd_name);
        }
        Ok(descriptor)
    }
}
