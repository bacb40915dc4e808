use super::{page_result, pagination_schema_properties, source_path, PageArgs};
use crate::config::PaginationConfig;
use crate::core::{Tool, ToolArgs, ToolError, ToolResult};
use crate::pagination::paginate_runs;
use crate::source::{sort_chronologically, ItemSource, JsonFileSource, RunFilter};
use anyhow::Result;
use tracing::info;

const USAGE: &str = "fetch_runs <path> [--trace-id=ID] [--run-type=TYPE] [--is-root=true|false] \
     [--page-number=N] [--max-chars-per-page=N] [--preview-chars=N]";

/// Tool returning one character-bounded page of runs
pub struct FetchRunsTool {
    name: String,
    defaults: PaginationConfig,
}

impl FetchRunsTool {
    pub fn new(defaults: PaginationConfig) -> Self {
        Self {
            name: "fetch_runs".to_string(),
            defaults,
        }
    }

    fn filter(args: &ToolArgs) -> Result<RunFilter, ToolError> {
        let is_root = match args.get_named_arg("is-root").map(String::as_str) {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(ToolError::InvalidArgs {
                    message: format!("--is-root expects true or false, got '{}'", other),
                })
            }
        };

        Ok(RunFilter {
            trace_id: args.get_named_arg("trace-id").cloned(),
            run_type: args.get_named_arg("run-type").cloned(),
            is_root,
            thread_id: None,
        })
    }
}

impl Tool for FetchRunsTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Fetch runs from an export, oldest first, as one page bounded by a character budget"
    }

    fn signature(&self) -> &str {
        USAGE
    }

    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError> {
        source_path(args, USAGE)?;
        Self::filter(args)?;
        PageArgs::parse(args, &self.defaults)?;
        Ok(())
    }

    fn execute(&self, args: &ToolArgs) -> Result<ToolResult> {
        let path = source_path(args, USAGE)?;
        let filter = Self::filter(args)?;
        let page_args = PageArgs::parse(args, &self.defaults)?;

        let mut runs = filter.apply(JsonFileSource::new(path).items()?);
        sort_chronologically(&mut runs);

        let page = paginate_runs(
            &runs,
            page_args.page_number,
            page_args.max_chars_per_page,
            page_args.preview_chars,
        );
        info!(
            tool = %self.name,
            runs = runs.len(),
            page = page.page_number,
            total_pages = page.total_pages,
            truncated = page.is_truncated(),
            "paginated runs"
        );

        Ok(page_result(&page))
    }

    fn get_parameters_schema(&self) -> serde_json::Value {
        let mut properties = pagination_schema_properties();
        properties["trace_id"] = serde_json::json!({
            "type": "string",
            "description": "Only runs belonging to this trace"
        });
        properties["run_type"] = serde_json::json!({
            "type": "string",
            "description": "Only runs of this type (llm, chain, tool, retriever, ...)"
        });
        properties["is_root"] = serde_json::json!({
            "type": "boolean",
            "description": "Only root runs (true) or only child runs (false)"
        });
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": ["path"]
        })
    }
}
