//! Resource fetcher
//!
//! Resolves one parsed inventory id to a [`ResolvedResource`]. Built-in kinds
//! are fetched directly when the id's group matches the built-in group;
//! anything else is looked up through the CRD cache and fetched with a dynamic
//! accessor built from the descriptor.

use std::sync::Arc;
use std::time::Duration;

use crate::kube::{ApiError, ClusterApi, ObjectTarget, ParsedIdentifier};

use super::crd_cache::CrdCache;
use super::resolved::ResolvedResource;

/// Why an inventory entry could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("malformed inventory id")]
    Malformed,

    #[error("no CRD installed for {kind} in group {group}")]
    CrdNotFound { group: String, kind: String },

    #[error("{kind} {name} not found")]
    NotFound { kind: String, name: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fetches single inventory entries against a [`ClusterApi`]
pub struct ResourceFetcher<A: ?Sized> {
    api: Arc<A>,
    crds: Arc<CrdCache>,
    timeout: Option<Duration>,
}

impl<A> ResourceFetcher<A>
where
    A: ClusterApi + ?Sized,
{
    pub fn new(api: Arc<A>, crds: Arc<CrdCache>) -> Self {
        Self {
            api,
            crds,
            timeout: None,
        }
    }

    /// Bound every fetch, including its CRD lookup, by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn crd_cache(&self) -> &Arc<CrdCache> {
        &self.crds
    }

    /// Resolve one inventory entry
    pub async fn fetch(&self, id: &ParsedIdentifier) -> Result<ResolvedResource, FetchFailure> {
        let (Some(target), Some(kind)) = (id.target(), id.kind.as_deref()) else {
            return Err(FetchFailure::Malformed);
        };
        let group = id.group_or_core();

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch_target(kind, group, &target))
                .await
                .unwrap_or_else(|_| Err(ApiError::Timeout(limit).into())),
            None => self.fetch_target(kind, group, &target).await,
        }
    }

    async fn fetch_target(
        &self,
        kind: &str,
        group: &str,
        target: &ObjectTarget,
    ) -> Result<ResolvedResource, FetchFailure> {
        // A CRD may reuse a built-in kind name (knative `Service`, for one)
        if let Some(resource) = self.api.builtin(kind).filter(|r| r.group == group) {
            tracing::debug!("Fetching built-in {} {}", kind, target.name);
            let raw = self
                .api
                .get_object(&resource, target)
                .await?
                .ok_or_else(|| not_found(kind, target))?;
            return Ok(ResolvedResource::from_builtin(raw, kind, group, target));
        }

        let crd = self
            .crds
            .resolve(self.api.as_ref(), group, kind)
            .await?
            .ok_or_else(|| FetchFailure::CrdNotFound {
                group: group.to_string(),
                kind: kind.to_string(),
            })?;

        tracing::debug!("Fetching custom resource {} {} via {}", kind, target.name, crd.name);
        let raw = self
            .api
            .get_object(&crd.api_resource(), target)
            .await?
            .ok_or_else(|| not_found(kind, target))?;
        Ok(ResolvedResource::from_custom(raw, kind, group, target))
    }
}

fn not_found(kind: &str, target: &ObjectTarget) -> FetchFailure {
    FetchFailure::NotFound {
        kind: kind.to_string(),
        name: match &target.namespace {
            Some(ns) => format!("{}/{}", ns, target.name),
            None => target.name.clone(),
        },
    }
}
