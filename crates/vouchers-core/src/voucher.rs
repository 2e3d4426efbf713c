//! Voucher data model shared by the scraper, the cache, and the remote store.
//!
//! ## Field mapping from the source site
//!
//! | source field    | [`VoucherRecord`] field |
//! |-----------------|-------------------------|
//! | `code`          | `code`                  |
//! | `title`         | `description`           |
//! | `creation_time` | `creation_date`         |
//! | `end_time`      | `expiration_date`       |
//!
//! Missing source fields stay `None` and serialize as JSON `null`, never as
//! an empty string.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::filter::{filter_vouchers, FilterConfig};

/// One voucher as extracted from a shop page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub code: Option<String>,
    pub description: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// All vouchers harvested for one shop during a single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEntry {
    /// Shop slug, the last path segment of `source_url`.
    pub name: String,
    pub source_url: String,
    pub vouchers: Vec<VoucherRecord>,
}

impl ShopEntry {
    /// Builds an entry, deriving `name` from the URL's last path segment.
    #[must_use]
    pub fn new(source_url: &str, vouchers: Vec<VoucherRecord>) -> Self {
        Self {
            name: shop_slug_from_url(source_url).to_owned(),
            source_url: source_url.to_owned(),
            vouchers,
        }
    }

    #[must_use]
    pub fn to_cache_file(&self) -> CacheFile {
        CacheFile {
            url: self.source_url.clone(),
            vouchers: self.vouchers.clone(),
        }
    }

    /// Strips dates and drops unusable codes for the remote store.
    #[must_use]
    pub fn to_remote_document(&self, filter: &FilterConfig) -> RemoteDocument {
        RemoteDocument {
            name: self.name.clone(),
            vouchers: filter_vouchers(&self.vouchers, filter),
        }
    }
}

/// On-disk shape of `<cache_dir>/<site_prefix>_<shop>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheFile {
    #[serde(rename = "URL")]
    pub url: String,
    pub vouchers: Vec<VoucherRecord>,
}

/// A voucher as published remotely: dates stripped, code guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVoucher {
    pub code: String,
    pub description: Option<String>,
}

/// Document stored under `vouchers/<shop name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub name: String,
    pub vouchers: Vec<RemoteVoucher>,
}

/// Document stored under `log/<YYYY-MM-DD>` after every completed pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogDocument {
    pub date: String,
    pub time: String,
}

impl RunLogDocument {
    #[must_use]
    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self {
            date: timestamp.format("%Y-%m-%d").to_string(),
            time: timestamp.format("%H:%M:%S").to_string(),
        }
    }

    /// Key of this document in the `log` collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.date
    }
}

/// Returns the last path segment of a shop URL, ignoring a trailing slash.
///
/// `"https://gutscheine.blick.ch/acme-gutscheine"` becomes `"acme-gutscheine"`.
#[must_use]
pub fn shop_slug_from_url(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
