//! Remote sink selection: the HTTP document store when configured, otherwise
//! a no-op so local caching still works without remote credentials.

use serde_json::Value;
use vouchers_store::{DocumentStore, HttpDocumentStore, StoreError};

pub(crate) enum RemoteSink {
    Http(HttpDocumentStore),
    Disabled,
}

impl RemoteSink {
    pub(crate) fn from_config(config: &vouchers_core::AppConfig) -> anyhow::Result<Self> {
        let Some(url) = config.store_url.as_deref() else {
            tracing::warn!("VOUCHERS_STORE_URL not set; vouchers will only be cached locally");
            return Ok(Self::Disabled);
        };
        let store = HttpDocumentStore::new(
            url,
            config.store_token.clone(),
            config.request_timeout_secs,
        )
        .map_err(|e| anyhow::anyhow!("failed to build remote store client: {e}"))?;
        Ok(Self::Http(store))
    }
}

impl DocumentStore for RemoteSink {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        match self {
            Self::Http(store) => store.put(collection, key, document).await,
            Self::Disabled => {
                tracing::debug!(collection, key, "remote store disabled; push skipped");
                Ok(())
            }
        }
    }
}
