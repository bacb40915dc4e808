//! Fitting a selected page into its character budget

use serde_json::Value;
use tracing::{debug, warn};

use super::truncate::compact;
use super::{Degraded, Page};

/// Upper end of the truncation-length search.
pub const SEARCH_CEILING: usize = 100_000;

/// Smallest preview kept on a degraded page.
pub const MIN_PREVIEW_CHARS: usize = 100;

pub const TRUNCATED_MESSAGE: &str = "Page exceeds maxCharsPerPage even with every string truncated; \
     items were dropped and a preview is shown instead. Use a larger maxCharsPerPage or a \
     smaller previewChars.";

pub const PREVIEW_SUFFIX: &str = "... (output truncated)";

/// Return `page` unchanged if it fits, otherwise the page rebuilt with the
/// largest uniform string length `t` that fits, otherwise a degraded page.
pub(super) fn enforce(page: Page) -> Page {
    let budget = page.max_chars_per_page;
    let size = page.serialized_len();
    if size <= budget {
        return page;
    }

    let floor = shrink(&page, 0);
    if floor.serialized_len() > budget {
        warn!(
            page_number = page.page_number,
            size,
            budget,
            "page does not fit even with all strings truncated, degrading"
        );
        return degrade(floor);
    }

    let fits = |t: usize| shrink(&page, t).serialized_len() <= budget;
    let (mut lo, mut hi) = (0usize, SEARCH_CEILING);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    debug!(
        page_number = page.page_number,
        size,
        budget,
        limit = lo,
        "truncated page strings to fit budget"
    );
    shrink(&page, lo)
}

fn shrink(page: &Page, limit: usize) -> Page {
    page.with_items(page.items.iter().map(|item| compact(item, limit)).collect())
}

/// Replace the page's items with a bounded textual preview of what it held.
fn degrade(best_effort: Page) -> Page {
    let budget = best_effort.max_chars_per_page;
    let full = best_effort.to_json_string();

    let mut page = best_effort.with_items(Vec::<Value>::new());
    page.degraded = Some(Degraded {
        message: TRUNCATED_MESSAGE.to_string(),
        preview: String::new(),
    });
    let overhead = page.serialized_len();
    let keep = (budget.saturating_sub(overhead) / 2).max(MIN_PREVIEW_CHARS);

    let mut preview: String = full.chars().take(keep).collect();
    preview.push_str(PREVIEW_SUFFIX);
    if let Some(degraded) = page.degraded.as_mut() {
        degraded.preview = preview;
    }
    page
}
