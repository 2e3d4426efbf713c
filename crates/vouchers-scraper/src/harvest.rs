//! Discovery of per-shop voucher pages on the overview page.
//!
//! The overview page embeds each shop as an object with a relative
//! `"url":"/<shop>-gutschein..."` field. The site uses both the singular
//! `-gutschein` and the plural `-gutscheine` suffix, so the character after
//! `-gutschein` decides which form is rebuilt.

use regex::Regex;

/// Extracts absolute shop URLs from the overview page, in order of
/// appearance. Duplicates are kept.
///
/// `origin` is prefixed to each rebuilt path; a trailing slash on it is
/// ignored.
#[must_use]
pub fn harvest_shop_urls(page: &str, origin: &str) -> Vec<String> {
    let url_field =
        Regex::new(r#","url":"/[^{]*?-gutschein."#).expect("valid url field regex");
    let segment = Regex::new(r"/([^/]*)-gutschein(.)").expect("valid segment regex");
    let origin = origin.trim_end_matches('/');

    url_field
        .find_iter(page)
        .filter_map(|field| {
            let caps = segment.captures(field.as_str())?;
            let slug = caps.get(1)?.as_str();
            let plural = if caps.get(2)?.as_str() == "e" { "e" } else { "" };
            Some(format!("{origin}/{slug}-gutschein{plural}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://gutscheine.blick.ch";

    #[test]
    fn plural_suffix_is_kept() {
        let urls = harvest_shop_urls(r#"{"name":"Acme","url":"/acme-gutscheine"}"#, ORIGIN);
        assert_eq!(urls, ["https://gutscheine.blick.ch/acme-gutscheine"]);
    }

    #[test]
    fn singular_suffix_when_next_char_is_not_e() {
        let urls = harvest_shop_urls(r#"{"id":1,"url":"/acme-gutschein-x"}"#, ORIGIN);
        assert_eq!(urls, ["https://gutscheine.blick.ch/acme-gutschein"]);
    }

    #[test]
    fn singular_suffix_before_closing_quote() {
        let urls = harvest_shop_urls(r#"{"id":1,"url":"/zalando-gutschein"}"#, ORIGIN);
        assert_eq!(urls, ["https://gutscheine.blick.ch/zalando-gutschein"]);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let page = concat!(
            r#"[{"id":1,"url":"/b-gutscheine"},{"id":2,"url":"/a-gutschein"},"#,
            r#"{"id":3,"url":"/b-gutscheine"}]"#,
        );
        let urls = harvest_shop_urls(page, ORIGIN);
        assert_eq!(
            urls,
            [
                "https://gutscheine.blick.ch/b-gutscheine",
                "https://gutscheine.blick.ch/a-gutschein",
                "https://gutscheine.blick.ch/b-gutscheine",
            ]
        );
    }

    #[test]
    fn nested_path_uses_last_segment() {
        let urls = harvest_shop_urls(r#"{"x":0,"url":"/shops/mode/acme-gutscheine"}"#, ORIGIN);
        assert_eq!(urls, ["https://gutscheine.blick.ch/acme-gutscheine"]);
    }

    #[test]
    fn match_does_not_cross_object_boundary() {
        // "url" without a -gutschein suffix before the next `{` is ignored.
        let page = r#"{"a":1,"url":"/kategorie/mode"},{"b":2,"url":"/acme-gutscheine"}"#;
        let urls = harvest_shop_urls(page, ORIGIN);
        assert_eq!(urls, ["https://gutscheine.blick.ch/acme-gutscheine"]);
    }

    #[test]
    fn origin_trailing_slash_is_ignored() {
        let urls = harvest_shop_urls(r#"{"id":1,"url":"/acme-gutscheine"}"#, "http://127.0.0.1:8080/");
        assert_eq!(urls, ["http://127.0.0.1:8080/acme-gutscheine"]);
    }

    #[test]
    fn nothing_to_harvest() {
        assert!(harvest_shop_urls("<html></html>", ORIGIN).is_empty());
    }
}
