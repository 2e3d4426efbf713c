pub mod app_config;
pub mod config;
pub mod filter;
pub mod voucher;

pub use app_config::{AppConfig, Pacing, Schedule};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{filter_vouchers, FilterConfig};
pub use voucher::{
    shop_slug_from_url, CacheFile, RemoteDocument, RemoteVoucher, RunLogDocument, ShopEntry,
    VoucherRecord,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
