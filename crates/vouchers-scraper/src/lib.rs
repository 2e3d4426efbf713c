pub mod client;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod pacing;
pub mod parse;
pub mod segment;
pub mod trim;

pub use client::VoucherClient;
pub use error::ScraperError;
pub use extract::{extract_vouchers, Extraction};
pub use harvest::harvest_shop_urls;
pub use pacing::Throttle;
pub use parse::parse_vouchers;
pub use segment::{BlickSegmenter, PageSegmenter, Segment, SegmentKind};
pub use trim::trim_json_tail;
