//! Tools exposing paginated platform data to LLM clients

use crate::config::PaginationConfig;
use crate::core::{ToolArgs, ToolError, ToolResult};
use crate::pagination::Page;

mod runs;
mod thread_history;

pub use runs::FetchRunsTool;
pub use thread_history::ThreadHistoryTool;

/// Pagination arguments shared by every paginated tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub page_number: i64,
    pub max_chars_per_page: usize,
    pub preview_chars: usize,
}

impl PageArgs {
    /// Read `--page-number`, `--max-chars-per-page` and `--preview-chars`,
    /// falling back to `defaults`. Negative preview lengths mean "no preview".
    pub fn parse(args: &ToolArgs, defaults: &PaginationConfig) -> Result<Self, ToolError> {
        let page_number = args.parse_named::<i64>("page-number")?.unwrap_or(1);

        let max_chars_per_page = match args.parse_named::<i64>("max-chars-per-page")? {
            None => defaults.default_max_chars_per_page,
            Some(value) if value > 0 => usize::try_from(value).unwrap_or(usize::MAX),
            Some(value) => {
                return Err(ToolError::InvalidArgs {
                    message: format!("--max-chars-per-page must be positive, got {}", value),
                })
            }
        };

        let preview_chars = match args.parse_named::<i64>("preview-chars")? {
            None => defaults.default_preview_chars,
            Some(value) => usize::try_from(value.max(0)).unwrap_or(usize::MAX),
        };

        Ok(Self {
            page_number,
            max_chars_per_page,
            preview_chars,
        })
    }
}

/// Positional export path every paginated tool reads from.
fn source_path<'a>(args: &'a ToolArgs, usage: &str) -> Result<&'a String, ToolError> {
    args.get_arg(0).ok_or_else(|| ToolError::InvalidArgs {
        message: format!("Usage: {}", usage),
    })
}

fn page_result(page: &Page) -> ToolResult {
    ToolResult::success_with_data(page.to_json_string(), page.to_value())
}

fn pagination_schema_properties() -> serde_json::Value {
    serde_json::json!({
        "path": {
            "type": "string",
            "description": "Path to the exported runs (JSON array, wrapped list or JSON Lines)"
        },
        "page_number": {
            "type": "integer",
            "description": "1-based page to return; out-of-range pages come back empty with the real totalPages",
            "default": 1
        },
        "max_chars_per_page": {
            "type": "integer",
            "description": "Character budget for the whole page (capped at 30000)"
        },
        "preview_chars": {
            "type": "integer",
            "description": "Truncate every string to this many characters first; 0 disables"
        }
    })
}
