use std::path::PathBuf;
use std::time::Duration;

use crate::filter::FilterConfig;

/// When the watch loop starts its next pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Once a day around `hour:00` local time, jittered by up to
    /// `deviation_secs` in either direction.
    DailyAt { hour: u32, deviation_secs: u64 },
    /// Fixed pause between the end of one pass and the start of the next.
    Interval { secs: u64 },
}

/// Randomized delay between consecutive shop fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub mean_secs: u64,
    pub spread_secs: u64,
    pub min_secs: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub verbose: bool,
    pub cache_dir: PathBuf,
    pub site_prefix: String,
    pub site_origin: String,
    pub overview_url: String,
    pub max_voucher_age_secs: u64,
    pub schedule: Schedule,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub pacing: Option<Pacing>,
    pub filter: FilterConfig,
    pub store_url: Option<String>,
    pub store_token: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn max_voucher_age(&self) -> Duration {
        Duration::from_secs(self.max_voucher_age_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("verbose", &self.verbose)
            .field("cache_dir", &self.cache_dir)
            .field("site_prefix", &self.site_prefix)
            .field("site_origin", &self.site_origin)
            .field("overview_url", &self.overview_url)
            .field("max_voucher_age_secs", &self.max_voucher_age_secs)
            .field("schedule", &self.schedule)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("pacing", &self.pacing)
            .field("filter", &self.filter)
            .field("store_url", &self.store_url)
            .field(
                "store_token",
                &self.store_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
