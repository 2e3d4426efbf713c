//! Remote document store: keyed whole-document upserts.
//!
//! The store is a plain collection/key/document model. [`HttpDocumentStore`]
//! talks to a REST endpoint laid out as `PUT {base}/{collection}/{key}` with
//! the JSON document as body. [`MemoryStore`] keeps documents in process.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde_json::Value;
use vouchers_core::{RemoteDocument, RunLogDocument};

use crate::error::StoreError;

pub const VOUCHERS_COLLECTION: &str = "vouchers";
pub const LOG_COLLECTION: &str = "log";

/// Shop slugs and ISO dates stay readable in the URL.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// A keyed document store. `put` replaces any existing document.
pub trait DocumentStore {
    fn put(
        &self,
        collection: &str,
        key: &str,
        document: &Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Publishes a shop's filtered vouchers under `vouchers/<name>`.
///
/// # Errors
///
/// Propagates the store's error; [`StoreError::Encode`] if the document
/// cannot be serialized.
pub async fn push_vouchers<S>(store: &S, document: &RemoteDocument) -> Result<(), StoreError>
where
    S: DocumentStore + Sync,
{
    let value = serde_json::to_value(document)?;
    store
        .put(VOUCHERS_COLLECTION, &document.name, &value)
        .await?;
    tracing::debug!(shop = %document.name, vouchers = document.vouchers.len(), "pushed vouchers");
    Ok(())
}

/// Records a completed pass under `log/<date>`.
///
/// # Errors
///
/// Propagates the store's error; [`StoreError::Encode`] if the document
/// cannot be serialized.
pub async fn push_run_log<S>(store: &S, document: &RunLogDocument) -> Result<(), StoreError>
where
    S: DocumentStore + Sync,
{
    let value = serde_json::to_value(document)?;
    store.put(LOG_COLLECTION, document.key(), &value).await?;
    tracing::debug!(date = %document.date, time = %document.time, "pushed run timestamp");
    Ok(())
}

/// REST-backed document store.
pub struct HttpDocumentStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpDocumentStore {
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if `base_url` does not parse, or
    /// [`StoreError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Exactly one trailing slash so joined paths append instead of
        // replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn document_url(&self, collection: &str, key: &str) -> Result<Url, StoreError> {
        let relative = format!(
            "{}/{}",
            utf8_percent_encode(collection, KEY_ENCODE_SET),
            utf8_percent_encode(key, KEY_ENCODE_SET)
        );
        self.base_url
            .join(&relative)
            .map_err(|e| StoreError::InvalidUrl {
                url: relative,
                reason: e.to_string(),
            })
    }
}

impl DocumentStore for HttpDocumentStore {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        let url = self.document_url(collection, key)?;
        let mut request = self.client.put(url.clone()).json(document);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

/// In-process store, keyed by `(collection, key)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<(String, String), Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, collection: &str, key: &str) -> Option<Value> {
        self.lock()
            .get(&(collection.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Keys present in `collection`, sorted.
    #[must_use]
    pub fn keys(&self, collection: &str) -> Vec<String> {
        self.lock()
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, k)| k.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), Value>> {
        // A poisoned map is still a consistent map: every insert is a single call.
        self.documents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        self.lock()
            .insert((collection.to_owned(), key.to_owned()), document.clone());
        Ok(())
    }
}
