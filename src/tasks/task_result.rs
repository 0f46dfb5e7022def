//! Outcome of executing one sub-task.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agents::WorkerOutput;
use crate::task::SubTask;

/// The result of running one [`SubTask`].
///
/// Exactly one result exists per sub-task per run; a retry replaces the
/// earlier result instead of adding a second one. `error` is present iff
/// `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// ID of the sub-task this result belongs to.
    pub task_id: String,
    /// Capability tag of the worker that ran it.
    pub capability: String,
    pub success: bool,
    /// The worker's answer (empty on failure).
    pub result: String,
    /// The worker's reasoning trace (empty on failure).
    pub reasoning: String,
    /// Wall-clock execution time.
    pub duration: Duration,
    pub error: Option<String>,
}

impl TaskResult {
    /// Build a result from a worker's answer and its success flag.
    pub fn from_output(
        task: &SubTask,
        output: WorkerOutput,
        success: bool,
        duration: Duration,
    ) -> Self {
        Self {
            task_id: task.id.clone(),
            capability: task.capability.clone(),
            success,
            result: output.answer,
            reasoning: output.reasoning,
            duration,
            error: (!success).then(|| "worker reported an unsuccessful run".to_string()),
        }
    }

    /// Build a failed result.
    pub fn failed(task: &SubTask, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            task_id: task.id.clone(),
            capability: task.capability.clone(),
            success: false,
            result: String::new(),
            reasoning: String::new(),
            duration,
            error: Some(error.into()),
        }
    }

    /// Execution time in milliseconds.
    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }

    /// One-line summary: first 10 words of the answer or the error.
    pub fn summary(&self) -> String {
        let text = match (&self.error, self.success) {
            (Some(err), false) => err.as_str(),
            _ => self.result.as_str(),
        };
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > 10 {
            format!("{}...", words[..10].join(" "))
        } else {
            words.join(" ")
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        write!(
            f,
            "[{}] {} ({}, {}ms): {}",
            self.task_id,
            status,
            self.capability,
            self.duration_ms(),
            self.summary()
        )
    }
}
