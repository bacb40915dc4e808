//! Tool execution orchestration for LLM function calls
//!
//! Every call in a batch yields a [`ToolExecutionResult`]; argument or
//! upstream failures become error content for that call and never abort the
//! rest of the batch.

use crate::ToolRegistry;
use serde_json::Value;
use tracing::{info, warn};

use super::converter::json_to_tool_args;

/// Result from a single tool execution
#[derive(Debug, Clone)]
pub struct ToolExecutionResult {
    /// Tool call ID (for provider correlation)
    pub tool_call_id: String,
    pub tool_name: String,
    /// Result content or error message
    pub content: String,
    pub success: bool,
}

impl ToolExecutionResult {
    fn failed(call: &ToolCallRequest, content: String) -> Self {
        warn!(tool = %call.name, call_id = %call.id, "{}", content);
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content,
            success: false,
        }
    }
}

/// Simple tool call representation for execution
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// JSON arguments as string
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Execute tool calls and return one result per call, in order
pub fn execute_tool_calls(
    registry: &ToolRegistry,
    tool_calls: Vec<ToolCallRequest>,
) -> Vec<ToolExecutionResult> {
    let mut results = Vec::with_capacity(tool_calls.len());

    for call in tool_calls {
        let args: Value = if call.arguments.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(args) => args,
                Err(e) => {
                    let msg = format!("Failed to parse tool arguments for {}: {}", call.name, e);
                    results.push(ToolExecutionResult::failed(&call, msg));
                    continue;
                }
            }
        };

        let tool_args = match json_to_tool_args(&call.name, args) {
            Ok(args) => args,
            Err(e) => {
                let msg = format!("Failed to convert arguments for {}: {}", call.name, e);
                results.push(ToolExecutionResult::failed(&call, msg));
                continue;
            }
        };

        match registry.execute_tool(&call.name, &tool_args) {
            Ok(result) => {
                info!(tool = %call.name, call_id = %call.id, success = result.success, "tool call complete");
                results.push(ToolExecutionResult {
                    tool_call_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    content: result.message,
                    success: result.success,
                });
            }
            Err(e) => {
                let msg = format!("Tool execution failed for {}: {}", call.name, e);
                results.push(ToolExecutionResult::failed(&call, msg));
            }
        }
    }

    results
}
