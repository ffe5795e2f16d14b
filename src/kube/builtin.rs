//! Built-in resource registry
//!
//! Kinds the Kubernetes API serves natively. These are fetched directly,
//! everything else goes through CRD discovery.

use k8s_openapi::api::{
    admissionregistration::v1::{MutatingWebhookConfiguration, ValidatingWebhookConfiguration},
    apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet},
    autoscaling::v2::HorizontalPodAutoscaler,
    batch::v1::{CronJob, Job},
    core::v1::{
        ConfigMap, Endpoints, LimitRange, Namespace, PersistentVolume, PersistentVolumeClaim, Pod,
        ResourceQuota, Secret, Service, ServiceAccount,
    },
    networking::v1::{Ingress, IngressClass, NetworkPolicy},
    policy::v1::PodDisruptionBudget,
    rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding},
    scheduling::v1::PriorityClass,
    storage::v1::StorageClass,
};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::ApiResource;

// Add a k8s-openapi type here to resolve it without CRD discovery
macro_rules! builtin_registry {
    ($($ty:ty),* $(,)?) => {
        /// Look up the API resource for a built-in kind
        pub fn builtin_resource(kind: &str) -> Option<ApiResource> {
            $(
                if kind == <$ty as k8s_openapi::Resource>::KIND {
                    return Some(ApiResource::erase::<$ty>(&()));
                }
            )*
            None
        }

        /// All registered built-in kinds
        pub fn builtin_kinds() -> &'static [&'static str] {
            &[$(<$ty as k8s_openapi::Resource>::KIND),*]
        }
    };
}

builtin_registry!(
    // core
    ConfigMap,
    Endpoints,
    LimitRange,
    Namespace,
    PersistentVolume,
    PersistentVolumeClaim,
    Pod,
    ResourceQuota,
    Secret,
    Service,
    ServiceAccount,
    // apps
    DaemonSet,
    Deployment,
    ReplicaSet,
    StatefulSet,
    // batch
    CronJob,
    Job,
    // networking
    Ingress,
    IngressClass,
    NetworkPolicy,
    // rbac
    ClusterRole,
    ClusterRoleBinding,
    Role,
    RoleBinding,
    // misc
    HorizontalPodAutoscaler,
    PodDisruptionBudget,
    PriorityClass,
    StorageClass,
    MutatingWebhookConfiguration,
    ValidatingWebhookConfiguration,
    CustomResourceDefinition,
);
