//! One refresh pass over every shop listed on the overview page.
//!
//! Shops are processed sequentially in harvested order. A failure while
//! fetching, caching, or publishing one shop is logged and counted; the pass
//! moves on to the next shop. Only an unreachable overview page or a failed
//! run-log push fails the pass as a whole.

mod sink;

use std::time::{Duration, SystemTime};

use anyhow::Context;
use thiserror::Error;
use vouchers_core::{shop_slug_from_url, AppConfig, FilterConfig, Pacing, RunLogDocument, ShopEntry};
use vouchers_scraper::{
    extract_vouchers, harvest_shop_urls, BlickSegmenter, PageSegmenter, ScraperError, Throttle,
    VoucherClient,
};
use vouchers_store::{push_run_log, push_vouchers, CacheDir, DocumentStore, Freshness, StoreError};

pub(crate) use sink::RemoteSink;

/// Why a single shop could not be refreshed.
#[derive(Debug, Error)]
pub(crate) enum ShopError {
    #[error("fetch failed: {0}")]
    Network(#[source] ScraperError),

    #[error("cache write failed: {0}")]
    Filesystem(#[source] StoreError),

    #[error("remote push failed: {0}")]
    RemoteStore(#[source] StoreError),
}

/// Counts for one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub harvested: usize,
    pub skipped: usize,
    pub refreshed: usize,
    pub failed: usize,
}

/// Everything a pass needs, built once per process.
pub(crate) struct Collector<S, G = BlickSegmenter> {
    pub client: VoucherClient,
    pub segmenter: G,
    pub cache: CacheDir,
    pub store: S,
    pub filter: FilterConfig,
    pub pacing: Option<Pacing>,
    pub overview_url: String,
    pub site_origin: String,
}

impl<S> Collector<S, BlickSegmenter>
where
    S: DocumentStore + Sync,
{
    /// Builds the fetch session and wires the configured cache and store.
    ///
    /// Failing to build the HTTP session is the one unrecoverable startup
    /// error.
    pub(crate) fn from_config(config: &AppConfig, store: S) -> anyhow::Result<Self> {
        let client = VoucherClient::new(config.request_timeout_secs, &config.user_agent)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP session: {e}"))?;
        Ok(Self {
            client,
            segmenter: BlickSegmenter,
            cache: CacheDir::new(&config.cache_dir, config.site_prefix.clone()),
            store,
            filter: config.filter.clone(),
            pacing: config.pacing,
            overview_url: config.overview_url.clone(),
            site_origin: config.site_origin.clone(),
        })
    }
}

impl<S, G> Collector<S, G>
where
    S: DocumentStore + Sync,
    G: PageSegmenter,
{
    /// Fetches the overview page and returns the shop URLs on it.
    pub(crate) async fn harvest(&self) -> anyhow::Result<Vec<String>> {
        let overview = self
            .client
            .fetch_page(&self.overview_url)
            .await
            .with_context(|| format!("fetching overview page {}", self.overview_url))?;
        let urls = harvest_shop_urls(&overview, &self.site_origin);
        tracing::info!(
            count = urls.len(),
            overview_url = %self.overview_url,
            "found shops with vouchers"
        );
        Ok(urls)
    }

    /// Runs a full pass. Shops whose cache file is younger than `max_age`
    /// are skipped; `Duration::ZERO` refreshes everything.
    pub(crate) async fn run_pass(&self, max_age: Duration) -> anyhow::Result<RunSummary> {
        let urls = self.harvest().await?;
        let mut summary = RunSummary {
            harvested: urls.len(),
            ..RunSummary::default()
        };
        let mut throttle = Throttle::new(self.pacing);

        for url in &urls {
            let shop = shop_slug_from_url(url);
            if self.cache.freshness(shop, max_age, SystemTime::now()) == Freshness::Fresh {
                tracing::debug!(shop, "skipping shop, recently updated");
                summary.skipped += 1;
                continue;
            }

            throttle.pause().await;

            match self.refresh_shop(url).await {
                Ok(entry) => {
                    tracing::debug!(
                        shop = %entry.name,
                        vouchers = entry.vouchers.len(),
                        "refreshed shop"
                    );
                    summary.refreshed += 1;
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "error processing shop");
                    summary.failed += 1;
                }
            }
        }

        let stamp = RunLogDocument::at(chrono::Local::now().naive_local());
        push_run_log(&self.store, &stamp)
            .await
            .context("pushing run timestamp")?;

        tracing::info!(
            harvested = summary.harvested,
            skipped = summary.skipped,
            refreshed = summary.refreshed,
            failed = summary.failed,
            "voucher pass complete"
        );
        Ok(summary)
    }

    /// Fetches and extracts one shop without touching the cache or store.
    pub(crate) async fn scrape_shop(&self, url: &str) -> Result<ShopEntry, ShopError> {
        let page = self
            .client
            .fetch_page(url)
            .await
            .map_err(ShopError::Network)?;
        let extraction = extract_vouchers(&page, &self.segmenter);
        if !extraction.failed_segments.is_empty() {
            tracing::warn!(
                url,
                failed = extraction.failed_segments.len(),
                "some voucher sections could not be decoded"
            );
        }
        Ok(ShopEntry::new(url, extraction.vouchers))
    }

    /// Fetch → extract → cache → publish for one shop.
    ///
    /// The cache is written before the remote push, so a push failure still
    /// leaves fresh local data behind.
    pub(crate) async fn refresh_shop(&self, url: &str) -> Result<ShopEntry, ShopError> {
        let entry = self.scrape_shop(url).await?;

        self.cache.write(&entry).map_err(ShopError::Filesystem)?;

        let document = entry.to_remote_document(&self.filter);
        push_vouchers(&self.store, &document)
            .await
            .map_err(ShopError::RemoteStore)?;

        Ok(entry)
    }
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
