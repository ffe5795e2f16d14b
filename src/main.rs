//! flux-inventory - inspect Flux objects and resolve the resources they manage
//!
//! Reads the compact inventory a Kustomization or HelmRelease keeps on its
//! status and turns it back into live cluster objects.

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cli::{ConfigSubcommand, GlobalOptions};
use flux_inventory::config::ConfigLoader;

/// Inspect Flux objects and resolve their inventories
#[derive(Parser, Debug)]
#[command(name = "flux-inventory", version)]
#[command(about = "Inspect Flux objects and resolve the resources they manage", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and list the objects a Flux object manages
    Inventory {
        /// Flux kind (e.g. Kustomization, ks, HelmRelease, hr)
        kind: String,
        name: String,
        #[arg(long, short = 'n')]
        namespace: Option<String>,
        /// Also print a link for every Flux-managed custom resource
        #[arg(long, short = 'w')]
        wide: bool,
    },
    /// List Flux objects of one kind
    List {
        kind: String,
        #[arg(long, short = 'n', conflicts_with = "all_namespaces")]
        namespace: Option<String>,
        /// List across all namespaces
        #[arg(long, short = 'A')]
        all_namespaces: bool,
    },
    /// Show the events of a Flux object
    Events {
        kind: String,
        name: String,
        #[arg(long, short = 'n')]
        namespace: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::init_logging(args.debug, args.log_file.as_deref())?;
    if let Some(ref path) = args.log_file {
        tracing::debug!("Logging to {}", path.display());
    }

    if let Command::Config { subcommand } = args.command {
        return cli::handle_config_command(subcommand);
    }

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, maxConcurrentFetches={}",
        config.default_namespace,
        config.resolver.max_concurrent_fetches
    );
    let opts = GlobalOptions {
        config,
        context: args.context,
    };

    match args.command {
        Command::Inventory {
            kind,
            name,
            namespace,
            wide,
        } => cli::handle_inventory_command(&opts, &kind, &name, namespace.as_deref(), wide).await,
        Command::List {
            kind,
            namespace,
            all_namespaces,
        } => cli::handle_list_command(&opts, &kind, namespace.as_deref(), all_namespaces).await,
        Command::Events {
            kind,
            name,
            namespace,
        } => cli::handle_events_command(&opts, &kind, &name, namespace.as_deref()).await,
        Command::Config { .. } => unreachable!("handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory() {
        let args =
            Args::try_parse_from(["flux-inventory", "inventory", "ks", "apps", "-n", "flux-system"])
                .unwrap();
        match args.command {
            Command::Inventory {
                kind,
                name,
                namespace,
                wide,
            } => {
                assert_eq!(kind, "ks");
                assert_eq!(name, "apps");
                assert_eq!(namespace.as_deref(), Some("flux-system"));
                assert!(!wide);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_list_namespace_conflicts_with_all() {
        assert!(Args::try_parse_from(["flux-inventory", "list", "hr", "-A", "-n", "apps"]).is_err());
        assert!(Args::try_parse_from(["flux-inventory", "--debug", "list", "hr", "-A"]).is_ok());
    }
}
