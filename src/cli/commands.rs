//! CLI command handlers

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;

use flux_inventory::config::{Config, ConfigLoader, get_config_value, paths};
use flux_inventory::inventory::{
    CrdCache, EntryStatus, InventoryAggregator, ResourceFetcher, StatusSummary,
};
use flux_inventory::kube::{
    KubeClusterApi, create_client, effective_namespace, extract_inventory,
    fetch::{fetch_events, fetch_flux_object, list_flux_objects},
};
use flux_inventory::models::FluxResourceKind;
use flux_inventory::present::{
    Table, event_rows, events_table, flux_objects_table, inventory_table, resource_link,
};

/// Settings shared by every cluster command
pub struct GlobalOptions {
    pub config: Config,
    /// Kubeconfig context; `None` uses the current one
    pub context: Option<String>,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show the effective configuration, or one value
    Show {
        /// Configuration key (e.g., "defaultNamespace", "resolver.maxConcurrentFetches")
        key: Option<String>,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

fn parse_kind(kind: &str) -> Result<FluxResourceKind> {
    FluxResourceKind::from_str_case_insensitive(kind).ok_or_else(|| {
        let known: Vec<&str> = FluxResourceKind::all().iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!("Unknown Flux kind '{}', expected one of: {}", kind, known.join(", "))
    })
}

/// Resolve and print the inventory of a Kustomization or HelmRelease
pub async fn handle_inventory_command(
    opts: &GlobalOptions,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
    wide: bool,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let namespace = effective_namespace(namespace, &opts.config.default_namespace);
    let client = create_client(opts.context.as_deref()).await?;

    let obj = fetch_flux_object(&client, kind, &namespace, name).await?;
    let entries = extract_inventory(&obj);
    if entries.is_empty() {
        println!("{} {}/{} has no inventory", kind, namespace, name);
        return Ok(());
    }

    let resolver = &opts.config.resolver;
    let api = Arc::new(KubeClusterApi::new(client));
    let mut fetcher = ResourceFetcher::new(api, Arc::new(CrdCache::new()));
    if let Some(timeout) = resolver.fetch_timeout() {
        fetcher = fetcher.with_timeout(timeout);
    }
    let mut aggregator = InventoryAggregator::new(fetcher);
    if let Some(limit) = resolver.concurrency_limit() {
        aggregator = aggregator.with_concurrency_limit(limit);
    }

    aggregator.set_inventory(entries);
    aggregator.settle().await;

    let resources = aggregator.resources();
    print!("{}", inventory_table(resources, Utc::now()));

    if wide {
        let mut links = Table::new(["name", "kind", "link"]);
        for resource in resources {
            if let Some(link) = resource_link(resource) {
                links.push_row(vec![
                    link.label.clone(),
                    resource.display_kind().to_string(),
                    link.path(),
                ]);
            }
        }
        if !links.is_empty() {
            println!();
            print!("{}", links);
        }
    }

    let summary = aggregator.summary();
    println!();
    println!("{}", summary_line(&summary));

    if opts.config.output.show_unresolved {
        for (entry, status) in aggregator.statuses() {
            match status {
                EntryStatus::NotFound { reason } => {
                    println!("  not-found  {}  {}", entry.id, reason)
                }
                EntryStatus::Failed { message } => println!("  error      {}  {}", entry.id, message),
                EntryStatus::Malformed => println!("  malformed  {}", entry.id),
                EntryStatus::Pending | EntryStatus::Resolved { .. } => {}
            }
        }
    }

    Ok(())
}

fn summary_line(summary: &StatusSummary) -> String {
    let mut line = format!("{} resolved", summary.resolved);
    for (count, label) in [
        (summary.not_found, "not found"),
        (summary.failed, "failed"),
        (summary.malformed, "malformed"),
    ] {
        if count > 0 {
            line.push_str(&format!(", {} {}", count, label));
        }
    }
    line
}

/// List Flux objects of one kind
pub async fn handle_list_command(
    opts: &GlobalOptions,
    kind: &str,
    namespace: Option<&str>,
    all_namespaces: bool,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let namespace =
        (!all_namespaces).then(|| effective_namespace(namespace, &opts.config.default_namespace));
    let client = create_client(opts.context.as_deref()).await?;

    let objects = list_flux_objects(&client, kind, namespace.as_deref()).await?;
    if objects.is_empty() {
        match namespace {
            Some(ns) => println!("No {} found in namespace {}", kind, ns),
            None => println!("No {} found", kind),
        }
        return Ok(());
    }

    print!("{}", flux_objects_table(&objects, Utc::now()));
    Ok(())
}

/// Print the events of one Flux object
pub async fn handle_events_command(
    opts: &GlobalOptions,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let namespace = effective_namespace(namespace, &opts.config.default_namespace);
    let client = create_client(opts.context.as_deref()).await?;

    let events = fetch_events(&client, kind, &namespace, name).await?;
    if events.is_empty() {
        println!("No events for {} {}/{}", kind, namespace, name);
        return Ok(());
    }

    print!("{}", events_table(&event_rows(&events, Utc::now())));
    Ok(())
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Show { key } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            match key {
                Some(key) => println!("{}", get_config_value(&config, &key)?),
                None => {
                    let yaml = serde_yaml::to_string(&config)
                        .context("Failed to serialize configuration")?;
                    print!("{}", yaml);
                }
            }
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => {
            let path = paths::root_config_path();
            ConfigLoader::validate(&path).context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("ks").unwrap(), FluxResourceKind::Kustomization);
        assert_eq!(parse_kind("HelmRelease").unwrap(), FluxResourceKind::HelmRelease);
        let err = parse_kind("Deployment").unwrap_err().to_string();
        assert!(err.contains("Unknown Flux kind 'Deployment'"));
        assert!(err.contains("Kustomization"));
    }

    #[test]
    fn test_summary_line() {
        let summary = StatusSummary {
            resolved: 4,
            not_found: 1,
            failed: 2,
            ..Default::default()
        };
        assert_eq!(summary_line(&summary), "4 resolved, 1 not found, 2 failed");
        assert_eq!(summary_line(&StatusSummary::default()), "0 resolved");
    }
}
