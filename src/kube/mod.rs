//! Kubernetes client module
//!
//! Connection setup, the [`ClusterApi`] seam used by inventory resolution,
//! and the direct fetch helpers behind the CLI views.

pub mod api;
pub mod builtin;
pub mod crd;
pub mod fetch;
pub mod inventory;

pub use api::{ApiError, ClusterApi, KubeClusterApi, ObjectTarget};
pub use crd::CrdDescriptor;
pub use inventory::{InventoryEntry, ParsedIdentifier, extract_inventory, parse_id};

use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Without an explicit context this uses the default loading strategy:
/// in-cluster config, then `KUBECONFIG`, then `~/.kube/config`. Proxy
/// settings are picked up from the kubeconfig and the standard
/// `HTTPS_PROXY`/`NO_PROXY` environment variables.
pub async fn create_client(context: Option<&str>) -> Result<Client> {
    let config = match context {
        Some(ctx) => {
            let options = KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context '{}'", ctx))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    tracing::debug!("Connecting to {}", config.cluster_url);
    Client::try_from(config).context("Failed to create Kubernetes client")
}

/// Resolve the namespace to use for a command
///
/// An explicit flag wins, then the `FLUX_INVENTORY_NAMESPACE` override
/// (already folded into the config), then the configured default.
pub fn effective_namespace(flag: Option<&str>, configured: &str) -> String {
    flag.filter(|ns| !ns.is_empty())
        .unwrap_or(configured)
        .to_string()
}
