//! JSON to ToolArgs conversion for LLM function calls
//!
//! Converts JSON arguments from LLM providers (OpenAI, Anthropic, etc.)
//! to the runpage ToolArgs format.

use crate::ToolArgs;
use anyhow::{bail, Result};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Convert function call JSON arguments to ToolArgs
///
/// `path` becomes the positional argument; every other key becomes a named
/// argument with underscores turned into dashes (`page_number` → `--page-number`).
/// Nulls are treated as omitted.
pub fn json_to_tool_args(tool_name: &str, args: Value) -> Result<ToolArgs> {
    let obj = match args {
        Value::Object(obj) => obj,
        Value::Null => return Ok(ToolArgs::default()),
        other => bail!(
            "Arguments for {} must be a JSON object, got {}",
            tool_name,
            other
        ),
    };

    let mut positional_args = Vec::new();
    let mut named_args = HashMap::new();

    for (key, value) in obj {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other @ (Value::Array(_) | Value::Object(_)) => {
                bail!("Argument '{}' for {} must be a scalar, got {}", key, tool_name, other)
            }
        };

        if key == "path" {
            positional_args.push(rendered);
        } else {
            named_args.insert(key.replace('_', "-"), rendered);
        }
    }

    debug!(tool = tool_name, ?positional_args, ?named_args, "converted tool arguments");
    Ok(ToolArgs::with_named_args(positional_args, named_args))
}
