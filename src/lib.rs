//! # runpage - Run PAGination for LLM clients
//!
//! Serves trace runs and conversation threads exported from an LLM
//! observability platform to LLM-driven clients, one page at a time, with
//! every page kept inside a character budget so responses never overrun a
//! context window.
//!
//! ## Features
//!
//! - **Pagination**: Stateless, deterministic character-budget pages with
//!   string truncation and a degraded preview fallback
//! - **Message Extraction**: Thread history assembled from chat runs
//! - **Sources**: JSON / JSON Lines platform exports, run filters, ordering
//! - **Tools**: `fetch_runs` and `get_thread_history`, with OpenAI-style schemas
//!
//! ## Usage
//!
//! ```rust
//! use runpage::pagination::paginate_runs;
//! use serde_json::json;
//!
//! let runs = vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})];
//! let page = paginate_runs(&runs, 1, 20_000, 150);
//! assert_eq!(page.total_pages, 1);
//! assert_eq!(page.items.len(), 3);
//! ```

pub mod config;
pub mod core;
pub mod llm;
pub mod messages;
pub mod pagination;
pub mod source;
pub mod tools;

// Re-export main types
pub use config::{PaginationConfig, RunpageConfig};
pub use core::{Tool, ToolArgs, ToolError, ToolRegistry, ToolResult};
pub use pagination::{paginate, paginate_messages, paginate_runs, truncate, ItemsField, Page};
pub use tools::{FetchRunsTool, ThreadHistoryTool};

/// Initialize the tool registry with all available tools
pub fn create_tool_registry(config: &RunpageConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(FetchRunsTool::new(config.pagination.clone())));
    registry.register(Box::new(ThreadHistoryTool::new(config.pagination.clone())));

    registry
}
