//! Trims trailing garbage after an embedded JSON array.

/// Returns `s` up to and including its last `]`, or `s` unchanged when it
/// contains no `]`.
#[must_use]
pub fn trim_json_tail(s: &str) -> &str {
    match s.rfind(']') {
        Some(idx) => &s[..=idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_after_last_bracket() {
        assert_eq!(trim_json_tail(r#"[{"a":[1]}],"next":"#), r#"[{"a":[1]}]"#);
    }

    #[test]
    fn no_bracket_returns_input() {
        assert_eq!(trim_json_tail(r#"{"a":1}"#), r#"{"a":1}"#);
        assert_eq!(trim_json_tail(""), "");
    }

    #[test]
    fn already_trimmed_is_unchanged() {
        assert_eq!(trim_json_tail("[1,2]"), "[1,2]");
    }

    #[test]
    fn output_is_prefix_ending_in_bracket() {
        for input in ["]", "a]b", "[[]]x]y", "ü]ö", "[\"ä\"] trailing"] {
            let out = trim_json_tail(input);
            assert!(out.len() <= input.len());
            assert!(out.ends_with(']'), "{input:?} -> {out:?}");
            assert!(input.starts_with(out));
        }
    }
}
