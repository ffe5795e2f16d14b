//! End-to-end inventory resolution against an in-memory cluster

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kube::core::ApiResource;
use serde_json::{Value, json};

use flux_inventory::inventory::{
    CrdCache, EntryStatus, InventoryAggregator, ResourceFetcher, resolve_inventory,
};
use flux_inventory::kube::builtin::builtin_resource;
use flux_inventory::kube::{
    ApiError, ClusterApi, CrdDescriptor, InventoryEntry, ObjectTarget, extract_inventory,
    parse_id,
};

const SOURCE_GROUP: &str = "source.toolkit.fluxcd.io";

/// Objects keyed by `(plural, namespace, name)`, with optional per-object delays
#[derive(Default)]
struct FakeCluster {
    objects: HashMap<(String, String, String), Value>,
    crds: HashMap<String, CrdDescriptor>,
    delays: HashMap<String, Duration>,
    crd_delay: Option<Duration>,
    crd_requests: AtomicUsize,
    object_requests: AtomicUsize,
}

impl FakeCluster {
    fn with_object(mut self, plural: &str, namespace: &str, name: &str, obj: Value) -> Self {
        self.objects.insert(
            (plural.to_string(), namespace.to_string(), name.to_string()),
            obj,
        );
        self
    }

    fn with_crd(mut self, crd: CrdDescriptor) -> Self {
        self.crds.insert(crd.name.clone(), crd);
        self
    }

    fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    fn with_crd_delay(mut self, delay: Duration) -> Self {
        self.crd_delay = Some(delay);
        self
    }

    fn crd_requests(&self) -> usize {
        self.crd_requests.load(Ordering::SeqCst)
    }

    fn object_requests(&self) -> usize {
        self.object_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    fn builtin(&self, kind: &str) -> Option<ApiResource> {
        builtin_resource(kind)
    }

    async fn get_object(
        &self,
        resource: &ApiResource,
        target: &ObjectTarget,
    ) -> Result<Option<Value>, ApiError> {
        self.object_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&target.name) {
            tokio::time::sleep(*delay).await;
        }
        let key = (
            resource.plural.clone(),
            target.namespace.clone().unwrap_or_default(),
            target.name.clone(),
        );
        Ok(self.objects.get(&key).cloned())
    }

    async fn get_crd(&self, crd_name: &str) -> Result<Option<CrdDescriptor>, ApiError> {
        self.crd_requests.fetch_add(1, Ordering::SeqCst);
        let delay = self.crd_delay.unwrap_or(Duration::from_millis(10));
        tokio::time::sleep(delay).await;
        Ok(self.crds.get(crd_name).cloned())
    }
}

fn source_crd(kind: &str, plural: &str) -> CrdDescriptor {
    CrdDescriptor {
        name: format!("{}.{}", plural, SOURCE_GROUP),
        group: SOURCE_GROUP.to_string(),
        kind: kind.to_string(),
        plural: plural.to_string(),
        namespaced: true,
        version: "v1".to_string(),
    }
}

fn entries(ids: &[&str]) -> Vec<InventoryEntry> {
    ids.iter().map(|id| InventoryEntry::new(*id, "v1")).collect()
}

fn sorted_names(aggregator: &InventoryAggregator<FakeCluster>) -> Vec<String> {
    let mut names: Vec<String> = aggregator
        .resources()
        .iter()
        .map(|r| r.metadata.name.clone())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_git_repository_resolves_through_crd() {
    let cluster = FakeCluster::default()
        .with_crd(source_crd("GitRepository", "gitrepositories"))
        .with_object(
            "gitrepositories",
            "default",
            "myrepo",
            json!({ "metadata": { "uid": "repo-1" }, "spec": { "url": "https://example.com/repo" } }),
        );

    let aggregator = resolve_inventory(
        Arc::new(cluster),
        Arc::new(CrdCache::new()),
        entries(&["default_myrepo_source.toolkit.fluxcd.io_GitRepository"]),
    )
    .await;

    let resources = aggregator.resources();
    assert_eq!(resources.len(), 1);
    let repo = &resources[0];
    assert_eq!(repo.json_data["kind"], "GitRepository");
    assert_eq!(repo.json_data["apiName"], SOURCE_GROUP);
    assert_eq!(repo.json_data["metadata"]["namespace"], "default");
    assert_eq!(repo.json_data["metadata"]["name"], "myrepo");
    assert!(!repo.builtin);
}

#[tokio::test]
async fn test_missing_crd_yields_empty_result() {
    let cluster = FakeCluster::default();
    let aggregator = resolve_inventory(
        Arc::new(cluster),
        Arc::new(CrdCache::new()),
        entries(&["default_x_example.com_Widget"]),
    )
    .await;

    assert!(aggregator.resources().is_empty());
    let (_, status) = aggregator.statuses().next().unwrap();
    assert!(matches!(status, EntryStatus::NotFound { .. }));
}

#[tokio::test]
async fn test_malformed_id_is_dropped() {
    let cluster = Arc::new(FakeCluster::default());
    let aggregator = resolve_inventory(
        Arc::clone(&cluster),
        Arc::new(CrdCache::new()),
        entries(&["onlyonepart"]),
    )
    .await;

    assert!(aggregator.resources().is_empty());
    assert_eq!(aggregator.summary().malformed, 1);
    assert_eq!(cluster.object_requests(), 0);
    assert_eq!(cluster.crd_requests(), 0);
}

#[tokio::test]
async fn test_result_is_independent_of_arrival_order() {
    let ids = [
        "apps_slow__ConfigMap",
        "apps_fast__ConfigMap",
        "apps_medium__ConfigMap",
    ];
    let build = |delays: [u64; 3]| {
        let mut cluster = FakeCluster::default();
        for (name, delay) in ["slow", "fast", "medium"].iter().zip(delays) {
            cluster = cluster
                .with_object(
                    "configmaps",
                    "apps",
                    name,
                    json!({ "kind": "ConfigMap", "metadata": { "name": name, "namespace": "apps", "uid": format!("cm-{}", name) } }),
                )
                .with_delay(name, Duration::from_millis(delay));
        }
        Arc::new(cluster)
    };

    let forward = resolve_inventory(build([30, 0, 15]), Arc::new(CrdCache::new()), entries(&ids)).await;
    let reverse = resolve_inventory(build([0, 30, 15]), Arc::new(CrdCache::new()), entries(&ids)).await;

    assert_eq!(sorted_names(&forward), vec!["fast", "medium", "slow"]);
    assert_eq!(sorted_names(&forward), sorted_names(&reverse));
}

#[tokio::test]
async fn test_shared_crd_is_fetched_once() {
    let mut cluster = FakeCluster::default().with_crd(source_crd("GitRepository", "gitrepositories"));
    let mut ids = Vec::new();
    for i in 0..6 {
        let name = format!("repo-{}", i);
        cluster = cluster.with_object(
            "gitrepositories",
            "flux-system",
            &name,
            json!({ "metadata": { "uid": format!("uid-{}", i) } }),
        );
        ids.push(format!("flux-system_{}_{}_GitRepository", name, SOURCE_GROUP));
    }
    let cluster = Arc::new(cluster);
    let crds = Arc::new(CrdCache::new());

    let inventory: Vec<InventoryEntry> =
        ids.iter().map(|id| InventoryEntry::new(id.as_str(), "v1")).collect();
    let aggregator = resolve_inventory(Arc::clone(&cluster), Arc::clone(&crds), inventory).await;

    assert_eq!(aggregator.resources().len(), 6);
    assert_eq!(cluster.crd_requests(), 1);
    assert_eq!(crds.len().await, 1);
}

#[tokio::test]
async fn test_builtin_kinds_skip_crd_discovery() {
    let cluster = Arc::new(
        FakeCluster::default()
            .with_object(
                "namespaces",
                "",
                "apps",
                json!({ "kind": "Namespace", "metadata": { "name": "apps", "uid": "ns-apps" } }),
            )
            .with_object(
                "deployments",
                "apps",
                "podinfo",
                json!({ "kind": "Deployment", "metadata": { "name": "podinfo", "namespace": "apps", "uid": "dep-1" } }),
            ),
    );

    let aggregator = resolve_inventory(
        Arc::clone(&cluster),
        Arc::new(CrdCache::new()),
        entries(&["_apps__Namespace", "apps_podinfo_apps_Deployment"]),
    )
    .await;

    assert_eq!(sorted_names(&aggregator), vec!["apps", "podinfo"]);
    assert!(aggregator.resources().iter().all(|r| r.builtin));
    assert_eq!(cluster.crd_requests(), 0);
}

#[tokio::test]
async fn test_duplicate_entries_collapse_by_uid() {
    let cluster = FakeCluster::default().with_object(
        "configmaps",
        "apps",
        "settings",
        json!({ "kind": "ConfigMap", "metadata": { "name": "settings", "namespace": "apps", "uid": "cm-1" } }),
    );

    let aggregator = resolve_inventory(
        Arc::new(cluster),
        Arc::new(CrdCache::new()),
        entries(&["apps_settings__ConfigMap", "apps_settings__ConfigMap"]),
    )
    .await;

    assert_eq!(aggregator.resources().len(), 1);
    assert_eq!(aggregator.summary().resolved, 2);
}

#[tokio::test]
async fn test_changing_inventory_discards_previous_pass() {
    let cluster = Arc::new(
        FakeCluster::default()
            .with_object(
                "configmaps",
                "apps",
                "old",
                json!({ "metadata": { "name": "old", "namespace": "apps", "uid": "old" } }),
            )
            .with_object(
                "configmaps",
                "apps",
                "new",
                json!({ "metadata": { "name": "new", "namespace": "apps", "uid": "new" } }),
            )
            .with_delay("old", Duration::from_millis(50)),
    );
    let fetcher = ResourceFetcher::new(Arc::clone(&cluster), Arc::new(CrdCache::new()));
    let mut aggregator = InventoryAggregator::new(fetcher);

    let first = aggregator.set_inventory(entries(&["apps_old__ConfigMap"]));
    let second = aggregator.set_inventory(entries(&["apps_new__ConfigMap"]));
    assert!(second > first);

    aggregator.settle().await;
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(sorted_names(&aggregator), vec!["new"]);
    assert!(aggregator.is_settled());
}

#[tokio::test]
async fn test_slow_object_fails_with_timeout() {
    let cluster = Arc::new(
        FakeCluster::default()
            .with_object(
                "configmaps",
                "apps",
                "slow",
                json!({ "metadata": { "name": "slow", "namespace": "apps", "uid": "cm-slow" } }),
            )
            .with_object(
                "configmaps",
                "apps",
                "fast",
                json!({ "metadata": { "name": "fast", "namespace": "apps", "uid": "cm-fast" } }),
            )
            .with_delay("slow", Duration::from_millis(200)),
    );
    let fetcher = ResourceFetcher::new(Arc::clone(&cluster), Arc::new(CrdCache::new()))
        .with_timeout(Duration::from_millis(20));
    let mut aggregator = InventoryAggregator::new(fetcher);

    aggregator.set_inventory(entries(&["apps_slow__ConfigMap", "apps_fast__ConfigMap"]));
    aggregator.settle().await;

    assert_eq!(sorted_names(&aggregator), vec!["fast"]);
    let summary = aggregator.summary();
    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.failed, 1);

    let (_, status) = aggregator
        .statuses()
        .find(|(entry, _)| entry.id == "apps_slow__ConfigMap")
        .unwrap();
    assert_eq!(
        *status,
        EntryStatus::Failed {
            message: "Request timed out after 20ms".to_string()
        }
    );
}

#[tokio::test]
async fn test_crd_lookup_cut_by_timeout_is_retried() {
    let cluster = Arc::new(
        FakeCluster::default()
            .with_crd(source_crd("GitRepository", "gitrepositories"))
            .with_crd_delay(Duration::from_millis(200))
            .with_object(
                "gitrepositories",
                "default",
                "myrepo",
                json!({ "metadata": { "uid": "repo-1" } }),
            ),
    );
    let crds = Arc::new(CrdCache::new());
    let id = parse_id("default_myrepo_source.toolkit.fluxcd.io_GitRepository");

    let impatient = ResourceFetcher::new(Arc::clone(&cluster), Arc::clone(&crds))
        .with_timeout(Duration::from_millis(20));
    let err = impatient.fetch(&id).await.unwrap_err();
    assert!(err.to_string().contains("timed out"));
    assert_eq!(cluster.crd_requests(), 1);
    assert!(crds.cached(SOURCE_GROUP, "GitRepository").await.is_none());

    let patient = ResourceFetcher::new(Arc::clone(&cluster), Arc::clone(&crds));
    let repo = patient.fetch(&id).await.unwrap();
    assert_eq!(repo.metadata.name, "myrepo");
    assert_eq!(cluster.crd_requests(), 2);
    assert!(crds.cached(SOURCE_GROUP, "GitRepository").await.is_some());
}

#[tokio::test]
async fn test_inventory_from_kustomization_status() {
    let kustomization = json!({
        "kind": "Kustomization",
        "metadata": { "name": "apps", "namespace": "flux-system" },
        "status": {
            "inventory": {
                "entries": [
                    { "id": "apps_settings__ConfigMap", "v": "v1" },
                    { "id": "default_myrepo_source.toolkit.fluxcd.io_GitRepository", "v": "v1" },
                    { "id": "apps_missing__Secret", "v": "v1" }
                ]
            }
        }
    });
    let cluster = FakeCluster::default()
        .with_crd(source_crd("GitRepository", "gitrepositories"))
        .with_object(
            "configmaps",
            "apps",
            "settings",
            json!({ "kind": "ConfigMap", "metadata": { "name": "settings", "namespace": "apps", "uid": "cm-1" } }),
        )
        .with_object(
            "gitrepositories",
            "default",
            "myrepo",
            json!({ "metadata": { "uid": "repo-1" } }),
        );

    let aggregator = resolve_inventory(
        Arc::new(cluster),
        Arc::new(CrdCache::new()),
        extract_inventory(&kustomization),
    )
    .await;

    assert_eq!(sorted_names(&aggregator), vec!["myrepo", "settings"]);
    let summary = aggregator.summary();
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.pending, 0);
}
