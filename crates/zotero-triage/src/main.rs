//! Zotero Triage - Entry Point
//!
//! Fetches a group collection, classifies its records by tag, prints the tag
//! distribution, and optionally writes JSON and CSV exports.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use zotero_triage::{
    ClassifierConfig, Config, RelevanceLabels,
    classifier::{Classifier, tag_frequency},
    config::api,
    fetcher::{CollectionFetcher, CollectionScope},
    formatters,
};

#[derive(Parser, Debug)]
#[command(name = "zotero-triage")]
#[command(about = "Fetch a Zotero group collection and triage it by relevance, assignee and topic tags")]
#[command(version)]
struct Cli {
    /// Zotero group ID
    #[arg(long, env = "ZOTERO_GROUP_ID")]
    group_id: String,

    /// Collection key; omit to fetch the whole group library
    #[arg(long, env = "ZOTERO_COLLECTION_ID")]
    collection_id: Option<String>,

    /// Zotero API key (needed for private groups)
    #[arg(long, env = "ZOTERO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the Zotero API
    #[arg(long, default_value = api::BASE_URL, env = "ZOTERO_API_URL")]
    api_url: String,

    /// Items per page
    #[arg(long, default_value_t = api::PAGE_SIZE, env = "ZOTERO_PAGE_SIZE")]
    page_size: usize,

    /// Names recognized as assignment tags (comma separated)
    #[arg(
        long,
        env = "ZOTERO_ROSTER",
        value_delimiter = ',',
        default_value = "Bára,Katka,Jan,Roxana,David,Adam"
    )]
    roster: Vec<String>,

    /// Assignee for records without an assignment tag
    #[arg(long, env = "ZOTERO_DEFAULT_ASSIGNEE", default_value = "Bára")]
    default_assignee: String,

    /// Tag meaning "relevant"
    #[arg(long, default_value = "RELEVANT")]
    relevant_label: String,

    /// Tag meaning "maybe relevant"
    #[arg(long, default_value = "MAYBE RELEVANT")]
    maybe_label: String,

    /// Tag meaning "not relevant"
    #[arg(long, default_value = "NOT RELEVANT")]
    not_relevant_label: String,

    /// Write the JSON summary to this file
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write a CSV export to this file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Print every classified record, not only the summary
    #[arg(long)]
    list: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        group = %cli.group_id,
        collection = ?cli.collection_id,
        "Starting Zotero triage"
    );

    let classifier_config = ClassifierConfig::new(cli.roster, cli.default_assignee)
        .with_relevance_labels(RelevanceLabels::new(
            cli.relevant_label,
            cli.maybe_label,
            cli.not_relevant_label,
        ));
    // Fail on a bad roster before spending any requests.
    let classifier = Classifier::new(classifier_config)?;

    let mut config = Config::new(cli.api_key).with_page_size(cli.page_size);
    config.api_base_url = cli.api_url;
    let fetcher = CollectionFetcher::from_config(config)?;

    let scope = CollectionScope { group_id: cli.group_id, collection_id: cli.collection_id };

    let records = tokio::select! {
        result = fetcher.fetch(&scope) => result.map_err(|e| {
            tracing::error!(
                stage = e.stage(),
                key = ?e.item_key(),
                retryable = e.is_retryable(),
                retry_after = ?e.retry_after(),
                error = %e,
                "Fetch failed"
            );
            e
        })?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
            anyhow::bail!("fetch cancelled");
        }
    };

    let classified = classifier.classify(&records);
    let report = tag_frequency(&classified);

    if cli.list {
        println!("{}", formatters::format_records_markdown(&classified));
    }
    println!("{}", formatters::format_triage_summary_markdown(&classified));
    println!("{}", formatters::format_tag_report_markdown(&report));

    if let Some(path) = &cli.json_out {
        let json = serde_json::to_string_pretty(&formatters::summary_json(&classified))?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), records = classified.len(), "Wrote JSON summary");
    }

    if let Some(path) = &cli.csv_out {
        tokio::fs::write(path, formatters::format_csv(&classified))
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), records = classified.len(), "Wrote CSV export");
    }

    Ok(())
}
