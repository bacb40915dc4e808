//! Greedy packing of items into size-bounded pages

use serde_json::Value;
use tracing::debug;

use super::{effective_budget, serialized_len};

/// The full ordered partition of an item list into pages.
///
/// Always re-derived from the items it is given; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet {
    pages: Vec<Vec<Value>>,
}

impl PageSet {
    /// Pack `items` in order, closing a page whenever the next item would push
    /// its running size past the (clamped) budget.
    ///
    /// A page is never left empty to respect the budget: an item that is
    /// larger than the budget on its own gets a page to itself.
    pub fn build(items: Vec<Value>, max_chars_per_page: usize) -> Self {
        let budget = effective_budget(max_chars_per_page);
        let mut pages = Vec::new();
        let mut current: Vec<Value> = Vec::new();
        let mut current_chars = 0usize;

        for item in items {
            let size = serialized_len(&item);
            if !current.is_empty() && current_chars.saturating_add(size) > budget {
                pages.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            current_chars = current_chars.saturating_add(size);
            current.push(item);
        }
        if !current.is_empty() {
            pages.push(current);
        }

        debug!(pages = pages.len(), budget, "packed items into pages");
        Self { pages }
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Items on the 1-based `page_number`; empty when out of range.
    pub fn page(&self, page_number: i64) -> &[Value] {
        match Self::index(page_number, self.pages.len()) {
            Some(idx) => &self.pages[idx],
            None => &[],
        }
    }

    /// Take ownership of the items on one page, dropping the rest.
    pub fn into_page(mut self, page_number: i64) -> Vec<Value> {
        match Self::index(page_number, self.pages.len()) {
            Some(idx) => self.pages.swap_remove(idx),
            None => Vec::new(),
        }
    }

    pub fn pages(&self) -> &[Vec<Value>] {
        &self.pages
    }

    fn index(page_number: i64, total: usize) -> Option<usize> {
        let idx = usize::try_from(page_number).ok()?.checked_sub(1)?;
        (idx < total).then_some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(ids: &[&str]) -> Vec<Value> {
        ids.iter().map(|id| json!({ "id": id })).collect()
    }

    #[test]
    fn test_one_item_per_page_when_pairs_overflow() {
        // Each {"id":"x"} is 10 chars; two of them exceed 12.
        let set = PageSet::build(ids(&["a", "b", "c"]), 12);
        assert_eq!(set.total_pages(), 3);
        assert_eq!(set.page(2), &[json!({"id": "b"})][..]);
    }

    #[test]
    fn test_running_total_may_reach_budget_exactly() {
        let set = PageSet::build(ids(&["a", "b", "c"]), 20);
        assert_eq!(set.total_pages(), 2);
        assert_eq!(set.page(1), &ids(&["a", "b"])[..]);
        assert_eq!(set.page(2), &ids(&["c"])[..]);
    }

    #[test]
    fn test_everything_fits_on_one_page() {
        let items = ids(&["a", "b", "c", "d"]);
        let set = PageSet::build(items.clone(), 10_000);
        assert_eq!(set.total_pages(), 1);
        assert_eq!(set.page(1), &items[..]);
    }

    #[test]
    fn test_empty_input_has_no_pages() {
        let set = PageSet::build(Vec::new(), 100);
        assert_eq!(set.total_pages(), 0);
        assert!(set.page(1).is_empty());
        assert!(set.page(0).is_empty());
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let set = PageSet::build(ids(&["a", "b", "c"]), 12);
        assert!(set.page(0).is_empty());
        assert!(set.page(-3).is_empty());
        assert!(set.page(4).is_empty());
        assert_eq!(set.total_pages(), 3);
    }

    #[test]
    fn test_oversized_item_gets_its_own_page() {
        let items = vec![
            json!({"id": "a"}),
            json!({"blob": "x".repeat(200)}),
            json!({"id": "c"}),
        ];
        let set = PageSet::build(items.clone(), 50);
        assert_eq!(set.total_pages(), 3);
        assert_eq!(set.page(2), &items[1..2]);
    }

    #[test]
    fn test_oversized_first_item_does_not_leave_empty_page() {
        let items = vec![json!({"blob": "x".repeat(200)}), json!({"id": "b"})];
        let set = PageSet::build(items, 50);
        assert_eq!(set.total_pages(), 2);
        assert!(set.pages().iter().all(|page| !page.is_empty()));
    }

    #[test]
    fn test_concatenated_pages_reproduce_input() {
        let items: Vec<Value> = (0..40)
            .map(|i| json!({"id": i, "text": "y".repeat(i * 7 % 90)}))
            .collect();
        for budget in [1, 30, 75, 160, 500, 30_000] {
            let set = PageSet::build(items.clone(), budget);
            let flattened: Vec<Value> = set.pages().iter().flatten().cloned().collect();
            assert_eq!(flattened, items, "budget {}", budget);
        }
    }

    #[test]
    fn test_budget_is_clamped_before_packing() {
        let items: Vec<Value> = (0..4).map(|_| json!({"text": "z".repeat(10_000)})).collect();
        let set = PageSet::build(items, 1_000_000);
        // 30000 ceiling: two ~10k items fit, a third would not.
        assert_eq!(set.total_pages(), 2);
    }

    #[test]
    fn test_into_page_takes_selected_items() {
        let set = PageSet::build(ids(&["a", "b", "c"]), 12);
        assert_eq!(set.clone().into_page(3), ids(&["c"]));
        assert!(set.into_page(9).is_empty());
    }
}
