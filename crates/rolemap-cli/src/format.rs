//! Output formatting for rolemap
//!
//! Supports two output formats:
//! - Text: stage headers, discovered id sets and the grouped summary,
//!   printed as the run progresses (default)
//! - JSON: one machine-readable document printed at the end

use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use rolemap_core::{
    AggregateStats, EnvironmentId, KafkaCluster, KafkaTopic, OrganizationId,
    SchemaRegistryCluster, SchemaSubject, ServiceAccountId, Summary, Topology,
};
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything a run produced, for JSON output.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub organizations: &'a [OrganizationId],
    pub environments: &'a [EnvironmentId],
    pub clusters: &'a [KafkaCluster],
    pub service_accounts: &'a [ServiceAccountId],
    pub topics: &'a [KafkaTopic],
    pub schema_registries: &'a [SchemaRegistryCluster],
    pub subjects: &'a [SchemaSubject],
    pub summary: &'a Summary,
    pub stats: AggregateStats,
}

impl<'a> Report<'a> {
    pub fn new(
        topology: &'a Topology,
        service_accounts: &'a [ServiceAccountId],
        summary: &'a Summary,
        stats: AggregateStats,
    ) -> Self {
        Self {
            organizations: &topology.organizations,
            environments: &topology.environments,
            clusters: &topology.clusters,
            service_accounts,
            topics: &topology.topics,
            schema_registries: &topology.schema_registries,
            subjects: &topology.subjects,
            summary,
            stats,
        }
    }
}

/// Format and print output based on configured format
pub struct Formatter {
    format: OutputFormat,
    colored: bool,
}

impl Formatter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    pub fn print_stage(&self, title: &str) {
        if self.format != OutputFormat::Text {
            return;
        }
        let line = format!("--- {title} ---");
        if self.colored {
            println!("\n{}", line.bold());
        } else {
            println!("\n{line}");
        }
    }

    /// Print one discovered set as `Label: [a, b, c]`.
    pub fn print_ids<T: Display>(&self, label: &str, ids: impl IntoIterator<Item = T>) {
        if self.format != OutputFormat::Text {
            return;
        }
        println!("\n{}", render_ids(label, ids));
    }

    /// Print the grouped summary (text) or the whole report (JSON).
    pub fn print_report(&self, report: &Report<'_>) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Text => {
                self.print_stage("Role and resource summary");
                for line in render_summary(report.summary) {
                    if self.colored && !line.starts_with(' ') {
                        println!("{}", line.cyan());
                    } else {
                        println!("{line}");
                    }
                }
                println!(
                    "\n{} unique role bindings ({} lookups, {} failed)",
                    report.summary.total, report.stats.queries, report.stats.failed
                );
            }
        }
        Ok(())
    }
}

fn render_ids<T: Display>(label: &str, ids: impl IntoIterator<Item = T>) -> String {
    let rendered: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    format!("{label}: [{}]", rendered.join(", "))
}

/// `resource:` header lines, each followed by `  - SA: <id> - Role: <role>`.
fn render_summary(summary: &Summary) -> Vec<String> {
    if summary.is_empty() {
        return vec!["No role bindings found".to_string()];
    }

    let mut lines = Vec::new();
    for group in &summary.groups {
        lines.push(format!("{}:", group.resource));
        lines.extend(group.entries.iter().map(|entry| format!("  - {entry}")));
    }
    lines
}
