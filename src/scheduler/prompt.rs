//! Context-aware prompt construction.

use serde_json::Value;

use crate::blackboard::Snapshot;

const CLOSING_INSTRUCTION: &str =
    "Please complete this task using the available context information.";

/// Build the prompt handed to a worker: the task description, then every
/// blackboard entry visible to it, then a closing instruction.
///
/// String values longer than `preview_chars` characters are cut and
/// suffixed with `...`. Keys are listed in sorted order.
pub fn build_prompt(description: &str, context: &Snapshot, preview_chars: usize) -> String {
    let mut prompt = format!("Task: {}\n\n", description);
    if !context.is_empty() {
        prompt.push_str("Available context from previous tasks:\n");
        for (key, value) in context {
            prompt.push_str(&format!("- {}: {}\n", key, preview(value, preview_chars)));
        }
        prompt.push('\n');
    }
    prompt.push_str(CLOSING_INSTRUCTION);
    prompt
}

fn preview(value: &Value, preview_chars: usize) -> String {
    match value {
        Value::String(s) if s.chars().count() > preview_chars => {
            let cut: String = s.chars().take(preview_chars).collect();
            format!("{}...", cut)
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
