//! Selection of vouchers worth publishing to the remote store.

use std::collections::BTreeSet;

use crate::voucher::{RemoteVoucher, VoucherRecord};

/// Phrases the source site puts in the `code` field when there is no code
/// to enter ("deducted directly", "no code needed", ...), plus truncated
/// fragments of them seen in the wild.
pub const DEFAULT_CODE_BLACKLIST: [&str; 5] = [
    "direkt abgezogen",
    "per Direktabzug",
    "kein Code notwendig",
    "gen",
    "dig",
];

/// Codes with fewer characters than this are dropped.
pub const DEFAULT_MIN_CODE_LENGTH: usize = 4;

/// Rules applied by [`filter_vouchers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Exact-match phrases that are not real codes.
    pub blacklist: BTreeSet<String>,
    /// Minimum code length in characters (inclusive).
    pub min_code_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blacklist: DEFAULT_CODE_BLACKLIST
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            min_code_length: DEFAULT_MIN_CODE_LENGTH,
        }
    }
}

impl FilterConfig {
    /// Returns `true` if `code` would survive filtering.
    #[must_use]
    pub fn accepts(&self, code: &str) -> bool {
        !self.blacklist.contains(code) && code.chars().count() >= self.min_code_length
    }
}

/// Drops vouchers without a usable code and strips the date fields.
///
/// A voucher is dropped when its code is absent, exactly matches a
/// blacklisted phrase, or is shorter than `min_code_length`. Order is
/// preserved.
#[must_use]
pub fn filter_vouchers(vouchers: &[VoucherRecord], config: &FilterConfig) -> Vec<RemoteVoucher> {
    vouchers
        .iter()
        .filter_map(|v| {
            let code = v.code.as_deref()?;
            config.accepts(code).then(|| RemoteVoucher {
                code: code.to_owned(),
                description: v.description.clone(),
            })
        })
        .collect()
}
