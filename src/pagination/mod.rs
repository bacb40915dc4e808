//! Character-budget pagination
//!
//! Splits a list of JSON items into pages whose serialized size stays within
//! a caller-supplied character budget, without cursors or stored state:
//!
//! 1. optional preview pass truncating every string to `preview_chars`
//! 2. greedy packing into pages ([`PageSet`])
//! 3. selection of the requested 1-based page
//! 4. uniform string truncation of that page until its envelope fits
//! 5. a degraded preview page when nothing else fits
//!
//! Sizes are Unicode scalar counts of the compact `serde_json` serialization.
//! None of this can fail: every degenerate case is a regular [`Page`].

mod budget;
mod pack;
mod truncate;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

pub use budget::{MIN_PREVIEW_CHARS, PREVIEW_SUFFIX, SEARCH_CEILING, TRUNCATED_MESSAGE};
pub use pack::PageSet;
pub use truncate::{marker, truncate};

/// Hard ceiling on any page budget, whatever the caller asks for.
pub const MAX_CHARS_PER_PAGE: usize = 30_000;

/// Clamp a requested budget into `1..=MAX_CHARS_PER_PAGE`.
pub fn effective_budget(requested: usize) -> usize {
    requested.clamp(1, MAX_CHARS_PER_PAGE)
}

/// Size of `value` as compact JSON, in characters.
pub fn serialized_len<T: Serialize + ?Sized>(value: &T) -> usize {
    // Serializing JSON values and pages cannot fail.
    serde_json::to_string(value)
        .map(|json| json.chars().count())
        .unwrap_or(usize::MAX)
}

/// Name of the field carrying a page's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsField {
    /// Trace/run pagination (`runs`).
    Runs,
    /// Message/thread-history pagination (`result`).
    Result,
}

impl ItemsField {
    pub fn key(self) -> &'static str {
        match self {
            ItemsField::Runs => "runs",
            ItemsField::Result => "result",
        }
    }
}

/// Diagnostic fields present only on a degraded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degraded {
    pub message: String,
    pub preview: String,
}

/// One requested page plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub field: ItemsField,
    pub items: Vec<Value>,
    /// As requested, even when out of range.
    pub page_number: i64,
    pub total_pages: usize,
    /// The effective, clamped budget.
    pub max_chars_per_page: usize,
    pub preview_chars: usize,
    pub degraded: Option<Degraded>,
}

impl Page {
    pub fn is_truncated(&self) -> bool {
        self.degraded.is_some()
    }

    /// Envelope size in characters, metadata included.
    pub fn serialized_len(&self) -> usize {
        serialized_len(self)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn with_items(&self, items: Vec<Value>) -> Page {
        Page {
            field: self.field,
            items,
            page_number: self.page_number,
            total_pages: self.total_pages,
            max_chars_per_page: self.max_chars_per_page,
            preview_chars: self.preview_chars,
            degraded: self.degraded.clone(),
        }
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.degraded.is_some() { 8 } else { 5 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.field.key(), &self.items)?;
        map.serialize_entry("pageNumber", &self.page_number)?;
        map.serialize_entry("totalPages", &self.total_pages)?;
        map.serialize_entry("maxCharsPerPage", &self.max_chars_per_page)?;
        map.serialize_entry("previewChars", &self.preview_chars)?;
        if let Some(degraded) = &self.degraded {
            map.serialize_entry("truncated", &true)?;
            map.serialize_entry("truncatedMessage", &degraded.message)?;
            map.serialize_entry("truncatedPreview", &degraded.preview)?;
        }
        map.end()
    }
}

/// Paginate `items` and return the requested page, fitted to the budget.
///
/// `preview_chars == 0` disables the preview pass. `total_pages` always
/// describes the partition of the full item list.
pub fn paginate(
    items: &[Value],
    page_number: i64,
    max_chars_per_page: usize,
    preview_chars: usize,
    field: ItemsField,
) -> Page {
    let budget = effective_budget(max_chars_per_page);
    let prepared: Vec<Value> = if preview_chars > 0 {
        items.iter().map(|item| truncate(item, preview_chars)).collect()
    } else {
        items.to_vec()
    };

    let pages = PageSet::build(prepared, budget);
    let total_pages = pages.total_pages();
    let page = Page {
        field,
        items: pages.into_page(page_number),
        page_number,
        total_pages,
        max_chars_per_page: budget,
        preview_chars,
        degraded: None,
    };

    budget::enforce(page)
}

/// [`paginate`] for runs, returned under `runs`.
pub fn paginate_runs(
    runs: &[Value],
    page_number: i64,
    max_chars_per_page: usize,
    preview_chars: usize,
) -> Page {
    paginate(runs, page_number, max_chars_per_page, preview_chars, ItemsField::Runs)
}

/// [`paginate`] for thread messages, returned under `result`.
pub fn paginate_messages(
    messages: &[Value],
    page_number: i64,
    max_chars_per_page: usize,
    preview_chars: usize,
) -> Page {
    paginate(
        messages,
        page_number,
        max_chars_per_page,
        preview_chars,
        ItemsField::Result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abc() -> Vec<Value> {
        vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})]
    }

    #[test]
    fn test_single_page_keeps_order() {
        let items = abc();
        let page = paginate_runs(&items, 1, 10_000, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items, items);
        assert!(!page.is_truncated());
    }

    #[test]
    fn test_envelope_shape() {
        let page = paginate_runs(&abc(), 1, 10_000, 0);
        assert_eq!(
            page.to_json_string(),
            r#"{"runs":[{"id":"a"},{"id":"b"},{"id":"c"}],"pageNumber":1,"totalPages":1,"maxCharsPerPage":10000,"previewChars":0}"#
        );
    }

    #[test]
    fn test_messages_use_result_field() {
        let page = paginate_messages(&abc(), 1, 10_000, 150);
        let value = page.to_value();
        assert_eq!(value["result"], json!(abc()));
        assert!(value.get("runs").is_none());
        assert_eq!(value["previewChars"], json!(150));
    }

    #[test]
    fn test_empty_input() {
        for page_number in [-1, 0, 1, 2] {
            let page = paginate_runs(&[], page_number, 1_000, 0);
            assert_eq!(page.total_pages, 0);
            assert!(page.items.is_empty());
            assert_eq!(page.page_number, page_number);
        }
    }

    #[test]
    fn test_out_of_range_reports_real_total() {
        let items: Vec<Value> = (0..30).map(|i| json!({"id": i, "pad": "x".repeat(40)})).collect();
        let total = paginate_runs(&items, 1, 400, 0).total_pages;
        assert!(total > 1);
        for page_number in [0, -5, total as i64 + 1] {
            let page = paginate_runs(&items, page_number, 400, 0);
            assert!(page.items.is_empty());
            assert_eq!(page.total_pages, total);
            assert_eq!(page.page_number, page_number);
            assert!(!page.is_truncated());
        }
    }

    #[test]
    fn test_three_tiny_pages() {
        let page = paginate_runs(&abc(), 2, 12, 0);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.max_chars_per_page, 12);
        // The metadata alone is larger than 12 characters.
        assert!(page.is_truncated());
        assert!(page.items.is_empty());
        assert!(page.degraded.unwrap().preview.contains(r#"{"id":"b"}"#));
    }

    #[test]
    fn test_preview_pass_applies_to_all_items() {
        let items = vec![json!({"text": "0123456789"}), json!({"text": "short"})];
        let page = paginate_runs(&items, 1, 10_000, 5);
        assert_eq!(
            page.items,
            vec![json!({"text": "01234… (+5 chars)"}), json!({"text": "short"})]
        );
        assert_eq!(page.preview_chars, 5);
    }

    #[test]
    fn test_budget_clamped_to_ceiling() {
        let page = paginate_runs(&abc(), 1, 1_000_000, 0);
        assert_eq!(page.max_chars_per_page, MAX_CHARS_PER_PAGE);
        assert_eq!(effective_budget(0), 1);
        assert_eq!(effective_budget(29_999), 29_999);
    }

    #[test]
    fn test_oversized_single_item_degrades() {
        let numbers: Vec<u64> = (0..5_000).map(|i| 1_000_000_000 + i).collect();
        let items = vec![json!({ "values": numbers })];
        assert!(serialized_len(&items[0]) >= 50_000);

        let page = paginate_runs(&items, 1, 30_000, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        let value = page.to_value();
        assert_eq!(value["truncated"], json!(true));
        assert!(!value["truncatedPreview"].as_str().unwrap().is_empty());
        assert_eq!(value["truncatedMessage"], json!(TRUNCATED_MESSAGE));
    }

    #[test]
    fn test_long_strings_are_truncated_not_dropped() {
        let items = vec![json!({"id": "r1", "outputs": {"text": "w".repeat(60_000)}})];
        let page = paginate_runs(&items, 1, 30_000, 0);
        assert!(!page.is_truncated());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0]["id"], json!("r1"));
        assert!(page.serialized_len() <= 30_000);
    }

    #[test]
    fn test_returned_pages_respect_budget() {
        let items: Vec<Value> = (0..25)
            .map(|i| {
                json!({
                    "id": format!("run-{}", i),
                    "inputs": {"prompt": "p".repeat(i * 53 % 700)},
                    "outputs": {"text": "o".repeat(i * 131 % 2_000)},
                    "tags": ["a", "b"]
                })
            })
            .collect();
        for budget in [200, 900, 2_500, 8_000] {
            let total = paginate_runs(&items, 1, budget, 0).total_pages;
            for page_number in 1..=total as i64 {
                let page = paginate_runs(&items, page_number, budget, 0);
                if page.is_truncated() {
                    let preview = &page.degraded.as_ref().unwrap().preview;
                    let bound = (budget / 2).max(MIN_PREVIEW_CHARS)
                        + PREVIEW_SUFFIX.chars().count();
                    assert!(preview.chars().count() <= bound);
                } else {
                    assert!(page.serialized_len() <= budget, "budget {}", budget);
                }
            }
        }
    }

    #[test]
    fn test_pages_concatenate_to_previewed_input() {
        let items: Vec<Value> = (0..50)
            .map(|i| json!({"id": i, "body": "b".repeat(i * 17 % 300)}))
            .collect();
        let previewed: Vec<Value> = items.iter().map(|item| truncate(item, 150)).collect();

        let total = paginate_runs(&items, 1, 3_000, 150).total_pages;
        let mut collected = Vec::new();
        for page_number in 1..=total as i64 {
            let page = paginate_runs(&items, page_number, 3_000, 150);
            if !page.is_truncated() {
                collected.extend(page.items);
            }
        }
        // Packing counts only item sizes, so a full page can overflow on
        // metadata and get its strings cut; compare identities only.
        let ids: Vec<&Value> = collected.iter().map(|item| &item["id"]).collect();
        let expected: Vec<&Value> = previewed.iter().map(|item| &item["id"]).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let items = vec![json!({"text": "x".repeat(500)})];
        let snapshot = items.clone();
        let _ = paginate_runs(&items, 1, 200, 50);
        assert_eq!(items, snapshot);
    }
}
