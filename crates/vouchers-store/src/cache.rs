//! Local voucher cache: one pretty-printed JSON file per shop.
//!
//! The file's modification time doubles as the freshness clock. There is no
//! separate "last fetched" record, so touching a cache file externally also
//! postpones its next refresh.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;
use vouchers_core::{CacheFile, ShopEntry};

use crate::error::StoreError;

/// Whether a shop's cached vouchers can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Cache file exists and is younger than the max age; skip the fetch.
    Fresh,
    /// No cache file, or it is at least max age old; fetch again.
    Stale,
}

/// Directory holding `<site_prefix>_<shop>.json` files.
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
    site_prefix: String,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>, site_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            site_prefix: site_prefix.into(),
        }
    }

    #[must_use]
    pub fn path_for(&self, shop: &str) -> PathBuf {
        self.root.join(format!("{}_{shop}.json", self.site_prefix))
    }

    /// Decides whether `shop` needs re-fetching at time `now`.
    ///
    /// Stale when no cache file exists or when `now - mtime >= max_age`.
    /// A modification time in the future counts as age zero. An unreadable
    /// mtime is treated as stale so the shop gets refetched.
    #[must_use]
    pub fn freshness(&self, shop: &str, max_age: Duration, now: SystemTime) -> Freshness {
        let path = self.path_for(shop);
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read cache mtime");
                }
                return Freshness::Stale;
            }
        };

        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age >= max_age {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// Overwrites the cache file for `entry`, creating the directory if needed.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Filesystem`] if the directory cannot be created or
    /// the file cannot be written, [`StoreError::Encode`] if serialization fails.
    pub fn write(&self, entry: &ShopEntry) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Filesystem {
            path: self.root.clone(),
            source: e,
        })?;

        let path = self.path_for(&entry.name);
        let bytes = to_pretty_json(&entry.to_cache_file())?;
        fs::write(&path, bytes).map_err(|e| StoreError::Filesystem {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(
            shop = %entry.name,
            vouchers = entry.vouchers.len(),
            path = %path.display(),
            "saved vouchers to cache"
        );
        Ok(path)
    }

    /// Reads the cache file for `shop`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Filesystem`] on read failure other than
    /// not-found, [`StoreError::CorruptCache`] if the file does not decode.
    pub fn read(&self, shop: &str) -> Result<Option<CacheFile>, StoreError> {
        let path = self.path_for(shop);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Filesystem { path, source: e }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::CorruptCache { path, source: e })
    }
}

/// Serializes with four-space indentation.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
