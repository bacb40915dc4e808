//! Item sources and run selection
//!
//! Runs come from a platform export on disk. A source is drained completely
//! into memory before pagination runs; asking it again re-reads from scratch.

use crate::core::ToolError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest integer magnitude that survives a round trip through an f64.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Keys under which an export object may hold its item list.
const LIST_KEYS: [&str; 3] = ["runs", "items", "result"];

/// Metadata keys that identify the conversation a run belongs to.
const THREAD_KEYS: [&str; 3] = ["thread_id", "session_id", "conversation_id"];

/// A finite, restartable sequence of items.
pub trait ItemSource {
    /// Read every item, normalized to plain JSON values.
    fn items(&self) -> Result<Vec<Value>, ToolError>;
}

impl ItemSource for Vec<Value> {
    fn items(&self) -> Result<Vec<Value>, ToolError> {
        Ok(self.iter().map(normalize).collect())
    }
}

/// Runs exported to a file: a JSON array, an object wrapping one, or JSON Lines.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> Result<Vec<Value>, ToolError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(Value::Object(mut map)) => {
                for key in LIST_KEYS {
                    if matches!(map.get(key), Some(Value::Array(_))) {
                        if let Some(Value::Array(items)) = map.remove(key) {
                            return Ok(items);
                        }
                    }
                }
                Ok(vec![Value::Object(map)])
            }
            Ok(other) => Ok(vec![other]),
            Err(_) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| serde_json::from_str::<Value>(line).map_err(ToolError::from))
                .collect(),
        }
    }
}

impl ItemSource for JsonFileSource {
    fn items(&self) -> Result<Vec<Value>, ToolError> {
        if !self.path.exists() {
            return Err(ToolError::FileNotFound {
                path: self.path.display().to_string(),
            });
        }
        let content = fs::read_to_string(&self.path)?;
        let items: Vec<Value> = Self::parse(&content)?.iter().map(normalize).collect();
        debug!(path = %self.path.display(), count = items.len(), "read items");
        Ok(items)
    }
}

/// Convert integers beyond [`MAX_SAFE_INTEGER`] to strings, recursively.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Number(n) => {
            let unsafe_int = match (n.as_u64(), n.as_i64()) {
                (Some(u), _) => u > MAX_SAFE_INTEGER,
                (None, Some(i)) => i.unsigned_abs() > MAX_SAFE_INTEGER,
                (None, None) => false,
            };
            if unsafe_int {
                Value::String(n.to_string())
            } else {
                value.clone()
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), normalize(v)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::String(_) => value.clone(),
    }
}

/// Selection criteria applied to runs before pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    pub trace_id: Option<String>,
    pub run_type: Option<String>,
    pub is_root: Option<bool>,
    pub thread_id: Option<String>,
}

impl RunFilter {
    pub fn matches(&self, run: &Value) -> bool {
        if let Some(trace_id) = &self.trace_id {
            if run.get("trace_id").and_then(Value::as_str) != Some(trace_id.as_str()) {
                return false;
            }
        }
        if let Some(run_type) = &self.run_type {
            if run.get("run_type").and_then(Value::as_str) != Some(run_type.as_str()) {
                return false;
            }
        }
        if let Some(is_root) = self.is_root {
            let root = run.get("parent_run_id").map_or(true, Value::is_null);
            if root != is_root {
                return false;
            }
        }
        if let Some(thread_id) = &self.thread_id {
            if thread_of(run) != Some(thread_id.as_str()) {
                return false;
            }
        }
        true
    }

    /// Keep matching runs, in their original order.
    pub fn apply(&self, runs: Vec<Value>) -> Vec<Value> {
        runs.into_iter().filter(|run| self.matches(run)).collect()
    }
}

/// Conversation id from `extra.metadata`, falling back to a top-level `thread_id`.
pub fn thread_of(run: &Value) -> Option<&str> {
    let metadata = run.get("extra").and_then(|extra| extra.get("metadata"));
    THREAD_KEYS
        .iter()
        .find_map(|key| metadata.and_then(|m| m.get(*key)).and_then(Value::as_str))
        .or_else(|| run.get("thread_id").and_then(Value::as_str))
}

/// Stable sort by `start_time`; runs without one come first.
pub fn sort_chronologically(runs: &mut [Value]) {
    runs.sort_by(|a, b| start_time(a).cmp(&start_time(b)));
}

fn start_time(run: &Value) -> Option<&str> {
    run.get("start_time").and_then(Value::as_str)
}
