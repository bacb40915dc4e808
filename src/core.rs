//! Core traits and types for the runpage tool layer

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Error types for tool operations
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    #[error("Invalid arguments: {message}")]
    InvalidArgs { message: String },
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },
    #[error("Execution failed: {message}")]
    ExecutionFailed { message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Arguments passed to tool execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolArgs {
    pub args: Vec<String>,
    pub named_args: HashMap<String, String>,
}

impl ToolArgs {
    /// Create ToolArgs from command line style arguments (`--key=value` is named)
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut positional = Vec::new();
        let mut named = HashMap::new();

        for arg in args {
            let arg = arg.as_ref();
            match arg.strip_prefix("--") {
                Some(flag) => match flag.split_once('=') {
                    Some((key, value)) => {
                        named.insert(key.to_string(), value.to_string());
                    }
                    None => {
                        named.insert(flag.to_string(), "true".to_string());
                    }
                },
                None => positional.push(arg.to_string()),
            }
        }

        Self {
            args: positional,
            named_args: named,
        }
    }

    /// Create ToolArgs with named arguments
    pub fn with_named_args(args: Vec<String>, named_args: HashMap<String, String>) -> Self {
        Self { args, named_args }
    }

    pub fn get_arg(&self, index: usize) -> Option<&String> {
        self.args.get(index)
    }

    pub fn get_named_arg(&self, name: &str) -> Option<&String> {
        self.named_args.get(name)
    }

    /// Parse a named argument, reporting unparsable values as invalid arguments.
    pub fn parse_named<T: FromStr>(&self, name: &str) -> Result<Option<T>, ToolError> {
        match self.named_args.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ToolError::InvalidArgs {
                    message: format!("--{} expects a number, got '{}'", name, raw),
                }),
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Result returned by tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn success_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Main trait for all tools
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get the tool description
    fn description(&self) -> &str;

    /// Get the tool usage/signature
    fn signature(&self) -> &str;

    /// Validate arguments before execution
    fn validate_args(&self, args: &ToolArgs) -> Result<(), ToolError>;

    /// Execute the tool with given arguments
    fn execute(&self, args: &ToolArgs) -> Result<ToolResult>;

    /// Get OpenAI function schema for this tool
    fn get_openai_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.get_parameters_schema()
            }
        })
    }

    /// Get parameters schema - should be overridden by implementing tools
    fn get_parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}

/// Registry for managing available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Validate and execute a tool by name
    pub fn execute_tool(&self, name: &str, args: &ToolArgs) -> Result<ToolResult, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::ToolNotFound {
            name: name.to_string(),
        })?;

        tool.validate_args(args)?;

        tool.execute(args).map_err(|e| match e.downcast::<ToolError>() {
            Ok(tool_error) => tool_error,
            Err(other) => ToolError::ExecutionFailed {
                message: format!("{:#}", other),
            },
        })
    }

    /// List all registered tool names, sorted
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get OpenAI function schemas for all tools
    pub fn get_all_schemas(&self) -> Vec<serde_json::Value> {
        self.list_tools()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.get_openai_schema())
            .collect()
    }
}
