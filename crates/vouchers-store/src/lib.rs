//! Persistence for harvested vouchers: the local JSON cache and the remote
//! document store.

pub mod cache;
pub mod error;
pub mod remote;

pub use cache::{CacheDir, Freshness};
pub use error::StoreError;
pub use remote::{
    push_run_log, push_vouchers, DocumentStore, HttpDocumentStore, MemoryStore, LOG_COLLECTION,
    VOUCHERS_COLLECTION,
};
