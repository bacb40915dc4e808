//! LLM integration module for runpage tools
//!
//! Glue for providers that use function calling with JSON arguments
//! (OpenAI, Anthropic, MCP hosts).
//!
//! ## Features
//!
//! - **JSON Conversion**: Convert function call JSON to runpage ToolArgs
//! - **Tool Execution**: Execute a batch of tool calls with per-call error reporting

pub mod converter;
pub mod executor;

// Re-export main types
pub use converter::json_to_tool_args;
pub use executor::{execute_tool_calls, ToolCallRequest, ToolExecutionResult};
