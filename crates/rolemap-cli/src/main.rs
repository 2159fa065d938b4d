//! rolemap
//!
//! Lists every role binding held by the service accounts of a cloud
//! streaming account.
//!
//! ## Overview
//!
//! A run has two stages:
//! 1. **Discovery**: organizations, environments, Kafka clusters, service
//!    accounts, topics, Schema Registry clusters and subjects are listed and
//!    printed as they are found
//! 2. **Aggregation**: for every service account, every scope pattern built
//!    from the discovered ids is looked up in the IAM role-bindings API; the
//!    results are deduplicated by binding id and printed grouped by resource
//!
//! Partial failures (an unreachable cluster, a forbidden listing, a failed
//! lookup) are logged to stderr and the run continues with what it has.
//!
//! ## Quick Start
//!
//! ```bash
//! export CONFLUENT_CLOUD_API_KEY=...
//! export CONFLUENT_CLOUD_API_SECRET=...
//!
//! # Environment-specific cluster / Schema Registry keys
//! export ENV_QZN062_API_KEY=...
//! export ENV_QZN062_API_SECRET=...
//! export ENV_QZN062_SR_API_KEY=...
//! export ENV_QZN062_SR_API_SECRET=...
//!
//! rolemap
//! rolemap --format json > bindings.json
//! ```
//!
//! ## Configuration
//!
//! See [`config`] for the TOML file and environment variables.
//! `RUST_LOG` controls log verbosity (default: info).

use anyhow::{Context, Result};
use clap::Parser;
use rolemap_client::{AuthorityClient, DiscoveryClient, HttpTransport, Transport};
use rolemap_core::{aggregate, scope_queries, summarize, Topology};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod format;

use config::Config;
use format::{Formatter, OutputFormat, Report};

#[derive(Parser)]
#[command(name = "rolemap")]
#[command(
    about = "Enumerate the role bindings of every service account across all discovered resources",
    long_about = None
)]
struct Cli {
    /// Config file (TOML). Defaults to $ROLEMAP_CONFIG or ~/.rolemap/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let credentials = config.credential_store();
    if !credentials.has_default() {
        anyhow::bail!(
            "No default credentials configured: set CONFLUENT_CLOUD_API_KEY and \
             CONFLUENT_CLOUD_API_SECRET, or [default_credentials] in the config file"
        );
    }

    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(credentials, config.transport_config())
            .context("Failed to create HTTP client")?,
    );
    let endpoints = config.endpoints();
    let formatter = Formatter::new(cli.format, !cli.no_color);

    let discovery = DiscoveryClient::new(transport.clone(), endpoints.clone())
        .with_max_pages(config.max_pages);
    let authority =
        AuthorityClient::new(transport, endpoints).with_max_pages(config.max_pages);

    info!(api = %config.api_base_url, "Starting resource discovery");
    let (topology, service_accounts) = discover(&discovery, &formatter).await;

    formatter.print_stage("Stage 2: Collecting role bindings for service accounts");
    let (bindings, stats) =
        aggregate(&authority, scope_queries(&service_accounts, &topology)).await;
    info!(
        queries = stats.queries,
        failed = stats.failed,
        returned = stats.returned,
        unique = stats.unique,
        "Aggregation complete"
    );

    let summary = summarize(&bindings);
    formatter.print_report(&Report::new(&topology, &service_accounts, &summary, stats))?;

    Ok(())
}

/// Stage 1: list every collection, printing each set as it arrives.
async fn discover(
    discovery: &DiscoveryClient,
    formatter: &Formatter,
) -> (Topology, Vec<rolemap_core::ServiceAccountId>) {
    formatter.print_stage("Stage 1: Resource ID discovery");

    let organizations = discovery.list_organizations().await;
    formatter.print_ids("Organization IDs", &organizations);

    let environments = discovery.list_environments().await;
    formatter.print_ids("Environment IDs", &environments);

    let clusters = discovery.list_clusters(&environments).await;
    formatter.print_ids(
        "Clusters",
        clusters
            .iter()
            .map(|cluster| format!("({}, {})", cluster.id, cluster.environment_id)),
    );

    let service_accounts = discovery.list_service_accounts().await;
    formatter.print_ids("Service account IDs", &service_accounts);

    let topics = discovery.list_topics(&clusters).await;
    formatter.print_ids("Kafka topic names", topics.iter().map(|topic| &topic.name));

    let schema_registries = discovery.list_sr_clusters(&environments).await;
    formatter.print_ids(
        "Schema Registry clusters",
        schema_registries.iter().map(|registry| {
            format!(
                "({}, {}, {})",
                registry.http_endpoint, registry.environment_id, registry.id
            )
        }),
    );

    let subjects = discovery.list_sr_subjects(&schema_registries).await;
    formatter.print_ids(
        "Schema Registry subjects",
        subjects.iter().map(|subject| &subject.name),
    );

    let topology = Topology {
        organizations,
        environments,
        clusters,
        topics,
        schema_registries,
        subjects,
    };
    (topology, service_accounts)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_defaults_to_text() {
        let cli = Cli::try_parse_from(["rolemap"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn test_json_format_flag() {
        let cli = Cli::try_parse_from(["rolemap", "--format", "json", "--no-color"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.no_color);
    }
}
