use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cache file {} is not valid JSON: {source}", path.display())]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("remote store HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote store returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid remote store URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
