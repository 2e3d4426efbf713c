//! Segment-then-parse for a single shop page.

use vouchers_core::VoucherRecord;

use crate::parse::parse_vouchers;
use crate::segment::{PageSegmenter, SegmentKind};

/// Vouchers recovered from one page plus the sections that failed to decode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub vouchers: Vec<VoucherRecord>,
    pub failed_segments: Vec<SegmentKind>,
}

/// Runs `segmenter` over `page` and parses every fragment.
///
/// A fragment that does not decode is logged and skipped; the vouchers from
/// the other sections are still returned. Vouchers keep section order, then
/// in-array order.
pub fn extract_vouchers<S>(page: &str, segmenter: &S) -> Extraction
where
    S: PageSegmenter + ?Sized,
{
    let mut extraction = Extraction::default();

    for segment in segmenter.segments(page) {
        match parse_vouchers(&segment.json) {
            Ok(vouchers) => extraction.vouchers.extend(vouchers),
            Err(e) => {
                tracing::warn!(
                    section = %segment.kind,
                    error = %e,
                    "skipping voucher section that failed to decode"
                );
                extraction.failed_segments.push(segment.kind);
            }
        }
    }

    extraction
}
