use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod client;
mod config;
mod domain;
mod render;
mod search;

#[cfg(test)]
mod test_utils;

use crate::client::AptosClient;
use crate::config::AppConfig;
use crate::domain::{Network, ReferenceData, SearchResult};
use crate::search::{
    PipelineState, Resolution, SearchCoordinator, SearchPipeline, SearchUpdate, classify,
    normalize_query,
};

/// LazyAptos - unified search for Aptos accounts, transactions, blocks and assets
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network to search (mainnet, testnet, devnet, local)
    #[arg(short, long, global = true)]
    network: Option<Network>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one query and print the results
    Search {
        query: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve queries typed on stdin, one per line, as a search box would
    Watch {
        /// Override the debounce interval in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Show how a query is classified without touching the network
    Classify { query: String },
    /// Print the effective configuration
    Config {
        /// Also write it to the configuration file
        #[arg(long)]
        save: bool,
    },
}

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "lazyaptos=debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }

    match cli.command {
        Commands::Search { query, json } => run_search(&config, &query, json).await,
        Commands::Watch { debounce_ms, json } => {
            if let Some(debounce_ms) = debounce_ms {
                config.debounce_ms = debounce_ms;
            }
            run_watch(&config, json).await
        }
        Commands::Classify { query } => {
            println!(
                "{}",
                render::render_classification(&normalize_query(&query), &classify(&query))
            );
            Ok(())
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                let path = config.save()?;
                eprintln!("Saved to {}", path.display());
            }
            Ok(())
        }
    }
}

fn build_pipeline(config: &AppConfig) -> Result<SearchPipeline> {
    let client = AptosClient::new(config.network, &config.http_config())?
        .with_endpoints(config.node_url.clone(), config.indexer_url.clone());
    tracing::debug!("Using {} node at {}", config.network, client.node_url());
    if !client.supports_ans() {
        tracing::debug!("Name lookups are unavailable on {}", config.network);
    }

    Ok(SearchPipeline::new(
        config.network,
        Arc::new(client),
        Arc::new(ReferenceData::builtin()),
        config.result_cache(),
    )
    .with_ttl_policy(config.ttl_policy())
    .with_owned_objects_limit(config.owned_objects_limit))
}

async fn run_search(config: &AppConfig, query: &str, json: bool) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let cancel = CancellationToken::new();
    tracing::debug!("Searching {} for '{query}'", pipeline.network());

    let resolution = tokio::select! {
        resolution = pipeline.resolve(query, &cancel) => resolution,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            Resolution::Aborted
        }
    };

    let outcome = match resolution {
        Resolution::Completed(outcome) => outcome,
        Resolution::Aborted | Resolution::Duplicate => bail!("search cancelled"),
    };

    print_results(&outcome.results, json)?;
    if outcome.state == PipelineState::Errored {
        bail!("every lookup failed; check the network connection or --network");
    }
    Ok(())
}

async fn run_watch(config: &AppConfig, json: bool) -> Result<()> {
    let pipeline = Arc::new(build_pipeline(config)?);
    let (mut coordinator, mut updates) = SearchCoordinator::new(pipeline, config.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => coordinator.on_input(&line),
                None => break,
            },
            Some(update) = updates.recv() => print_update(&update, json)?,
            _ = tokio::signal::ctrl_c() => {
                coordinator.clear();
                return Ok(());
            }
        }
    }

    // Stdin closed: let the last pending search finish.
    while !coordinator.is_idle() {
        tokio::select! {
            Some(update) = updates.recv() => print_update(&update, json)?,
            () = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
    }
    while let Ok(update) = updates.try_recv() {
        print_update(&update, json)?;
    }
    Ok(())
}

fn print_update(update: &SearchUpdate, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "query": update.query,
                "from_cache": update.from_cache,
                "results": update.results,
            })
        );
    } else {
        println!("> {}", update.query);
        print_results(&update.results, false)?;
    }
    Ok(())
}

fn print_results(results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else if !results.is_empty() {
        println!("{}", render::render_results(results));
    }
    Ok(())
}
