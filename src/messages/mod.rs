//! Message extraction from chat runs
//!
//! A run's `inputs` and `outputs` are walked structurally: a `messages` array
//! is a list of messages (LangChain-style batches of lists are flattened one
//! level) and a `message` object is a single message. Found messages are not
//! searched any further, and the walk stops at [`MAX_MESSAGE_DEPTH`].

use serde_json::Value;
use std::collections::HashSet;

pub const MAX_MESSAGE_DEPTH: usize = 8;

/// Messages found in one run, inputs first, in document order.
pub fn extract_messages(run: &Value) -> Vec<Value> {
    let mut found = Vec::new();
    for key in ["inputs", "outputs"] {
        if let Some(section) = run.get(key) {
            collect(section, 0, &mut found);
        }
    }
    found
}

fn collect(value: &Value, depth: usize, found: &mut Vec<Value>) {
    if depth > MAX_MESSAGE_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("messages", Value::Array(list)) => push_list(list, found),
                    ("message", Value::Object(_)) => found.push(child.clone()),
                    _ => collect(child, depth + 1, found),
                }
            }
        }
        Value::Array(list) => {
            for child in list {
                collect(child, depth + 1, found);
            }
        }
        _ => {}
    }
}

fn push_list(list: &[Value], found: &mut Vec<Value>) {
    for entry in list {
        match entry {
            Value::Object(_) => found.push(entry.clone()),
            Value::Array(batch) => found.extend(batch.iter().filter(|m| m.is_object()).cloned()),
            _ => {}
        }
    }
}

/// Messages of a whole thread.
///
/// `runs` must already be in chronological order. Chat runs replay earlier
/// turns in their inputs, so a message is kept only the first time it appears.
pub fn thread_history(runs: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();
    runs.iter()
        .flat_map(extract_messages)
        .filter(|message| seen.insert(message.to_string()))
        .collect()
}
