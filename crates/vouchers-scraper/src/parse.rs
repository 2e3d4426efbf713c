//! Decoding of voucher JSON fragments into [`VoucherRecord`]s.

use serde::Deserialize;
use serde_json::Value;
use vouchers_core::VoucherRecord;

use crate::error::ScraperError;

/// One element of a voucher array as the site serves it. Only the fields we
/// keep are modelled; the rest are ignored.
///
/// Fields are kept as raw JSON values because the site is not consistent
/// about types (codes occasionally arrive as numbers, timestamps as either
/// strings or integers).
#[derive(Debug, Deserialize)]
struct RawVoucher {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    creation_time: Option<Value>,
    #[serde(default)]
    end_time: Option<Value>,
}

impl From<RawVoucher> for VoucherRecord {
    fn from(raw: RawVoucher) -> Self {
        Self {
            code: raw.code.and_then(scalar_to_string),
            description: raw.title.and_then(scalar_to_string),
            creation_date: raw.creation_time.and_then(scalar_to_string),
            expiration_date: raw.end_time.and_then(scalar_to_string),
        }
    }
}

/// Strings pass through, numbers and booleans are rendered, `null` and
/// containers become `None`.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses one JSON array of voucher objects.
///
/// Maps `code → code`, `title → description`, `creation_time →
/// creation_date`, `end_time → expiration_date`. Missing fields become
/// `None`.
///
/// # Errors
///
/// Returns [`ScraperError::Decode`] if `fragment` is not valid JSON or is not
/// an array of objects.
pub fn parse_vouchers(fragment: &str) -> Result<Vec<VoucherRecord>, ScraperError> {
    let raw: Vec<RawVoucher> =
        serde_json::from_str(fragment).map_err(|e| ScraperError::Decode {
            context: format!("voucher fragment ({} bytes)", fragment.len()),
            source: e,
        })?;
    Ok(raw.into_iter().map(VoucherRecord::from).collect())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
