//! Page segmentation: locating the voucher JSON arrays embedded in a shop page.
//!
//! The source site ships its voucher data inside a large inline JSON blob.
//! Instead of parsing the whole blob (its shape changes often and parts of it
//! are not valid JSON on their own), the segmenter cuts the raw text at fixed
//! landmarks and hands each candidate array to the parser. Anything that
//! depends on the site's markup lives behind [`PageSegmenter`] so the rest of
//! the pipeline can be reused for another provider.

use std::borrow::Cow;

use crate::trim::trim_json_tail;

/// Which voucher section of the page a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Active,
    Deal,
    Generic,
    Similar,
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentKind::Active => write!(f, "active"),
            SegmentKind::Deal => write!(f, "deal"),
            SegmentKind::Generic => write!(f, "generic"),
            SegmentKind::Similar => write!(f, "similar"),
        }
    }
}

/// A candidate JSON-array fragment cut out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub json: Cow<'a, str>,
}

/// Splits a shop page into JSON-array fragments, in section order.
pub trait PageSegmenter {
    fn segments<'a>(&self, page: &'a str) -> Vec<Segment<'a>>;
}

const EXPIRED_CODES: &str = r#""expired_codes":"#;
const EXPIRED_DEALS: &str = r#","expired_deals":"#;
const WIDGET_API_MAPPING: &str = r#"]},{"widget_api_mapping""#;
const VOUCHERS: &str = r#","vouchers":"#;
const EXPIRED_VOUCHERS: &str = r#","expiredVouchers":"#;
const SIMILAR_VOUCHERS: &str = r#""similarVouchers":"#;

/// Segmenter for `gutscheine.blick.ch` shop pages.
///
/// Landmarks are searched in order, each one in the text left over after the
/// previous cut:
///
/// | section   | starts after                | ends before                  |
/// |-----------|-----------------------------|------------------------------|
/// | `Active`  | last `"expired_codes":`     | `,"expired_deals":`          |
/// | `Deal`    | (previous cut)              | `]},{"widget_api_mapping"`   |
/// | `Generic` | `,"vouchers":`              | `,"expiredVouchers":`        |
/// | `Similar` | (previous cut)              | `"similarVouchers":`         |
///
/// A missing landmark skips its section. Without `"expired_codes":` the
/// search starts from the top of the page, which usually still finds the
/// later sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlickSegmenter;

impl PageSegmenter for BlickSegmenter {
    fn segments<'a>(&self, page: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::with_capacity(4);

        let mut rest = match page.rfind(EXPIRED_CODES) {
            Some(idx) => &page[idx + EXPIRED_CODES.len()..],
            None => page,
        };

        if let Some((active, after)) = rest.split_once(EXPIRED_DEALS) {
            segments.push(Segment {
                kind: SegmentKind::Active,
                json: Cow::Borrowed(trim_json_tail(active)),
            });
            rest = after;
        }

        if let Some((deal, after)) = rest.split_once(WIDGET_API_MAPPING) {
            // The landmark swallows the array's closing bracket.
            segments.push(Segment {
                kind: SegmentKind::Deal,
                json: Cow::Owned(format!("{deal}]")),
            });
            rest = after;
        }

        if let Some((_, vouchers)) = rest.split_once(VOUCHERS) {
            if let Some((generic, after)) = vouchers.split_once(EXPIRED_VOUCHERS) {
                segments.push(Segment {
                    kind: SegmentKind::Generic,
                    json: Cow::Borrowed(trim_json_tail(generic)),
                });
                rest = after;
            }
        }

        if let Some((similar, _)) = rest.split_once(SIMILAR_VOUCHERS) {
            segments.push(Segment {
                kind: SegmentKind::Similar,
                json: Cow::Borrowed(trim_json_tail(similar)),
            });
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[Segment<'_>]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    /// Shaped like the inline state blob of a real shop page.
    const FULL_PAGE: &str = concat!(
        r#"<script>window.__STATE__={"shop":{"expired_codes":[{"code":"OLD"}],"#,
        r#""expired_deals":[{"code":"DEAL1","title":"Deal"}]},{"widget_api_mapping":{}},"#,
        r#"{"props":{"x":1,"vouchers":[{"code":"GEN1"}],"expiredVouchers":"#,
        r#"[{"code":"EXP1"}],"similarVouchers":[{"code":"SIM"}]}}</script>"#,
    );

    #[test]
    fn full_page_yields_four_sections_in_order() {
        let segments = BlickSegmenter.segments(FULL_PAGE);
        assert_eq!(
            kinds(&segments),
            [
                SegmentKind::Active,
                SegmentKind::Deal,
                SegmentKind::Generic,
                SegmentKind::Similar
            ]
        );
        assert_eq!(segments[0].json, r#"[{"code":"OLD"}]"#);
        assert_eq!(segments[1].json, r#"[{"code":"DEAL1","title":"Deal"}]"#);
        assert_eq!(segments[2].json, r#"[{"code":"GEN1"}]"#);
        assert_eq!(segments[3].json, r#"[{"code":"EXP1"}]"#);
    }

    #[test]
    fn uses_last_expired_codes_occurrence() {
        let page = concat!(
            r#""expired_codes":[{"code":"STALE"}],"expired_deals":[]"#,
            r#" ... "expired_codes":[{"code":"FRESH"}],"expired_deals":[]"#,
        );
        let segments = BlickSegmenter.segments(page);
        assert_eq!(segments[0].json, r#"[{"code":"FRESH"}]"#);
    }

    #[test]
    fn missing_anchor_searches_whole_page() {
        let page = r#"{"a":1,"vouchers":[{"code":"GEN1"}],"expiredVouchers":[],"similarVouchers":[]}"#;
        let segments = BlickSegmenter.segments(page);
        assert_eq!(kinds(&segments), [SegmentKind::Generic, SegmentKind::Similar]);
        assert_eq!(segments[0].json, r#"[{"code":"GEN1"}]"#);
        assert_eq!(segments[1].json, "[]");
    }

    #[test]
    fn vouchers_without_expired_vouchers_is_skipped() {
        let page = r#""expired_codes":[],"expired_deals":[],"vouchers":[{"code":"X"}]"#;
        let segments = BlickSegmenter.segments(page);
        assert_eq!(kinds(&segments), [SegmentKind::Active]);
    }

    #[test]
    fn page_without_landmarks_yields_nothing() {
        assert!(BlickSegmenter.segments("<html><body>nothing</body></html>").is_empty());
        assert!(BlickSegmenter.segments("").is_empty());
    }

    #[test]
    fn deal_section_gets_closing_bracket_back() {
        let page = r#""expired_codes":[],"expired_deals":[{"code":"D"}]},{"widget_api_mapping":{}}"#;
        let segments = BlickSegmenter.segments(page);
        assert_eq!(kinds(&segments), [SegmentKind::Active, SegmentKind::Deal]);
        assert_eq!(segments[1].json, r#"[{"code":"D"}]"#);
    }
}
