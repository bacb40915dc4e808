//! String-leaf truncation for JSON values
//!
//! Long strings are cut to a prefix followed by a marker such as
//! `"abcde… (+5 chars)"`. Strings that already carry a marker are read back
//! as `(prefix, elided)` so that repeated truncation stays idempotent and the
//! elided count always refers to the original string.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::serialized_len;

/// Build the marker appended after a truncated prefix.
pub fn marker(elided: usize) -> String {
    format!("… (+{} chars)", elided)
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^(.*)… \(\+(\d+) chars\)$").expect("marker pattern is a valid regex")
    })
}

/// A string viewed as the part that is still visible plus what was cut before.
struct Marked<'a> {
    prefix: &'a str,
    prefix_chars: usize,
    elided: usize,
}

impl<'a> Marked<'a> {
    fn parse(s: &'a str) -> Self {
        if let Some(caps) = marker_pattern().captures(s) {
            if let (Some(prefix), Some(count)) = (caps.get(1), caps.get(2)) {
                if let Ok(elided) = count.as_str().parse::<usize>() {
                    let prefix = prefix.as_str();
                    return Self {
                        prefix,
                        prefix_chars: prefix.chars().count(),
                        elided,
                    };
                }
            }
        }

        Self {
            prefix: s,
            prefix_chars: s.chars().count(),
            elided: 0,
        }
    }

    /// Cut the visible prefix to `limit` characters, or `None` if it already fits.
    fn cut(&self, limit: usize) -> Option<String> {
        if self.prefix_chars <= limit {
            return None;
        }

        let end = self
            .prefix
            .char_indices()
            .nth(limit)
            .map(|(idx, _)| idx)
            .unwrap_or(self.prefix.len());

        Some(format!(
            "{}{}",
            &self.prefix[..end],
            marker(self.prefix_chars - limit + self.elided)
        ))
    }
}

/// Truncate every string leaf longer than `preview_chars` characters.
///
/// `preview_chars == 0` means "no truncation" and returns an unchanged copy.
/// Keys, numbers, booleans and nulls are never touched; object key order and
/// array order are preserved.
pub fn truncate(value: &Value, preview_chars: usize) -> Value {
    if preview_chars == 0 {
        return value.clone();
    }
    map_strings(value, &|s| Marked::parse(s).cut(preview_chars))
}

/// Truncation used while fitting a page into its budget.
///
/// Unlike [`truncate`], `limit == 0` really cuts strings down to the marker,
/// and a string is only replaced when the replacement serializes shorter.
/// That keeps the serialized size non-decreasing in `limit`.
pub(crate) fn compact(value: &Value, limit: usize) -> Value {
    map_strings(value, &|s| {
        Marked::parse(s)
            .cut(limit)
            .filter(|cut| serialized_len(cut.as_str()) < serialized_len(s))
    })
}

fn map_strings(value: &Value, replace: &dyn Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::String(s) => replace(s).map(Value::String).unwrap_or_else(|| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(|v| map_strings(v, replace)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), map_strings(v, replace)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncates_long_string_with_marker() {
        let value = json!("abcdefghij");
        assert_eq!(truncate(&value, 5), json!("abcde… (+5 chars)"));
    }

    #[test]
    fn test_short_and_exact_strings_unchanged() {
        assert_eq!(truncate(&json!("abc"), 5), json!("abc"));
        assert_eq!(truncate(&json!("abcde"), 5), json!("abcde"));
    }

    #[test]
    fn test_zero_preview_is_noop() {
        let value = json!({"text": "a".repeat(500)});
        assert_eq!(truncate(&value, 0), value);
    }

    #[test]
    fn test_recurses_and_preserves_structure() {
        let value = json!({
            "zeta": "0123456789",
            "alpha": [1, true, null, "short", {"deep": "0123456789"}],
            "0123456789": 3.5
        });
        let result = truncate(&value, 4);

        assert_eq!(
            result,
            json!({
                "zeta": "0123… (+6 chars)",
                "alpha": [1, true, null, "shor… (+1 chars)", {"deep": "0123… (+6 chars)"}],
                "0123456789": 3.5
            })
        );
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "0123456789"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let value = json!("ééééééé");
        assert_eq!(truncate(&value, 3), json!("ééé… (+4 chars)"));
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let value = json!({
            "a": "abcdefghijklmnopqrstuvwxyz",
            "b": ["x".repeat(40), "tiny"],
            "c": "ab… (+3 chars)"
        });
        for n in [0, 1, 2, 5, 13, 30] {
            let once = truncate(&value, n);
            assert_eq!(truncate(&once, n), once, "n = {}", n);
        }
    }

    #[test]
    fn test_retruncation_keeps_original_elided_count() {
        let once = truncate(&json!("abcdefghij"), 5);
        assert_eq!(truncate(&once, 2), json!("ab… (+8 chars)"));
        // A longer limit leaves the already-truncated value alone.
        assert_eq!(truncate(&once, 8), once);
    }

    #[test]
    fn test_never_mutates_input() {
        let value = json!({"text": "0123456789"});
        let snapshot = value.clone();
        let _ = truncate(&value, 3);
        assert_eq!(value, snapshot);
    }

    #[test]
    fn test_compact_zero_cuts_to_marker() {
        let value = json!({"text": "x".repeat(100)});
        assert_eq!(compact(&value, 0), json!({"text": "… (+100 chars)"}));
    }

    #[test]
    fn test_compact_skips_replacements_that_grow() {
        // Cutting one char off a 10-char string would add a 12-char marker.
        let value = json!("0123456789");
        assert_eq!(compact(&value, 9), value);
        assert_eq!(compact(&value, 0), value);
    }

    #[test]
    fn test_compact_size_is_monotonic() {
        let value = json!({
            "input": "lorem ipsum \"quoted\" ".repeat(30),
            "output": ["y".repeat(17), "z".repeat(250)],
            "name": "run"
        });
        let mut previous = usize::MAX;
        for limit in (0..=700).rev() {
            let size = serialized_len(&compact(&value, limit));
            assert!(size <= previous, "size grew at limit {}", limit);
            previous = size;
        }
    }

    #[test]
    fn test_truncate_size_is_monotonic_below_string_lengths() {
        let value = json!({"a": "q".repeat(300), "b": "w".repeat(120)});
        let mut previous = usize::MAX;
        for n in (1..100).rev() {
            let size = serialized_len(&truncate(&value, n));
            assert!(size <= previous, "size grew at n {}", n);
            previous = size;
        }
    }
}
