use super::{page_result, pagination_schema_properties, source_path, PageArgs};
use crate::config::PaginationConfig;
use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use crate::messages::thread_history;
use crate::pagination::paginate_messages;
use crate::source::{sort_chronologically, ItemSource, JsonFileSource, RunFilter};
use anyhow::Result;
use tracing::info;

const USAGE: &str = "get_thread_history <path> --thread-id=ID [--page-number=N] \
     [--max-chars-per-page=N] [--preview-chars=N]";

/// Tool returning the de-duplicated message history of one conversation thread
pub struct ThreadHistoryTool {
    name: String,
    defaults: PaginationConfig,
}

impl ThreadHistoryTool {
    pub fn new(defaults: PaginationConfig) -> Self {
        Self {
            name: "get_thread_history".to_string(),
            defaults,
        }
    }

    fn thread_id(args: &ToolArgs) -> Result<&String, ToolError> {
        args.get_named_arg("thread-id")
            .filter(|id| !id.trim().is_empty() && id.as_str() != "true")
            .ok_or_else(|| ToolError::InvalidArgs {
                message: format!("--thread-id is required. Usage: {}", USAGE),
            })
    }
}

impl Tool for ThreadHistoryTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Get the message history of a conversation thread as one page bounded by a character budget"
    }

    fn signature(&self) -> &str {
        USAGE
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        source_path(args, USAGE)?;
        Self::thread_id(args)?;
        PageArgs::parse(args, &self.defaults)?;
        Ok(())
    }

    fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let path = source_path(args, USAGE)?;
        let thread_id = Self::thread_id(args)?;
        let page_args = PageArgs::parse(args, &self.defaults)?;

        let filter = RunFilter {
            thread_id: Some(thread_id.clone()),
            ..Default::default()
        };
        let mut runs = filter.apply(JsonFileSource::new(path).items()?);
        sort_chronologically(&mut runs);
        let messages = thread_history(&runs);

        let page = paginate_messages(
            &messages,
            page_args.page_number,
            page_args.max_chars_per_page,
            page_args.preview_chars,
        );
        info!(
            tool = %self.name,
            thread_id = %thread_id,
            runs = runs.len(),
            messages = messages.len(),
            page = page.page_number,
            total_pages = page.total_pages,
            truncated = page.is_truncated(),
            "paginated thread history"
        );

        Ok(page_result(&page))
    }

    fn get_parameters_schema(&self) -> serde_json::Value {
        let mut properties = pagination_schema_properties();
        properties["thread_id"] = serde_json::json!({
            "type": "string",
            "description": "Conversation id (thread_id, session_id or conversation_id in run metadata)"
        });
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": ["path", "thread_id"]
        })
    }
}
