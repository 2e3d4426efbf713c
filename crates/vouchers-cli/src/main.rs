mod collect;
mod schedule;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vouchers_core::shop_slug_from_url;

use crate::collect::{Collector, RemoteSink};

const VERBOSE_FILTER: &str = "info,vouchers_cli=debug,vouchers_scraper=debug,vouchers_store=debug";

#[derive(Debug, Parser)]
#[command(name = "vouchers")]
#[command(about = "Collects voucher codes from gutscheine.blick.ch")]
struct Cli {
    /// Log debug output from the collector crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Refresh every shop whose cache file is stale, once.
    Run {
        /// Refresh every shop regardless of cache age.
        #[arg(long)]
        force: bool,
    },
    /// Refresh now, then again on the configured schedule until interrupted.
    Watch,
    /// Print the shop URLs listed on the overview page.
    Harvest,
    /// Scrape one shop page and print its vouchers.
    Shop {
        /// Shop page URL.
        url: String,
        /// Print the cached file instead of fetching the page.
        #[arg(long)]
        cached: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = vouchers_core::load_app_config()?;
    config.verbose |= cli.verbose;

    let default_filter = if config.verbose {
        VERBOSE_FILTER.to_string()
    } else {
        config.log_level.clone()
    };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let store = RemoteSink::from_config(&config)?;
    let collector = Collector::from_config(&config, store)?;

    match cli.command.unwrap_or(Commands::Run { force: false }) {
        Commands::Run { force } => {
            let max_age = if force {
                Duration::ZERO
            } else {
                config.max_voucher_age()
            };
            let summary = collector.run_pass(max_age).await?;
            println!(
                "harvested {} shops: {} refreshed, {} skipped, {} failed",
                summary.harvested, summary.refreshed, summary.skipped, summary.failed
            );
        }
        Commands::Watch => {
            schedule::watch(
                &collector,
                &config.schedule,
                config.max_voucher_age(),
                shutdown_signal(),
            )
            .await;
        }
        Commands::Harvest => {
            for url in collector.harvest().await? {
                println!("{url}");
            }
        }
        Commands::Shop { url, cached } => {
            let file = if cached {
                let shop = shop_slug_from_url(&url);
                collector
                    .cache
                    .read(shop)?
                    .with_context(|| format!("no cached vouchers for {shop}"))?
            } else {
                collector.scrape_shop(&url).await?.to_cache_file()
            };
            println!("{}", serde_json::to_string_pretty(&file)?);
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests;
