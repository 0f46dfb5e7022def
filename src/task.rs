//! Sub-tasks: one unit of decomposed work each.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utilities::config::SchedulerConfig;

fn default_priority() -> i32 { 1 }
fn default_timeout() -> Duration { Duration::from_secs(300) }
fn default_max_retries() -> u32 { 2 }

/// A unit of work handed to one worker.
///
/// Sub-tasks are created by the decomposer for a single routing decision
/// and are immutable during a run except for `retry_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    /// Identifier, unique within one decomposition.
    pub id: String,
    /// Capability tag of the worker that should run this task.
    pub capability: String,
    /// Text handed to the worker as its prompt.
    pub description: String,
    /// Tasks that must complete before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Tie-break only; higher runs first when admission is contended.
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Maximum number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Retries consumed so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl SubTask {
    /// Create a sub-task with default priority, timeout and retry budget.
    pub fn new(
        id: impl Into<String>,
        capability: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            capability: capability.into(),
            description: description.into(),
            dependencies: Vec::new(),
            priority: default_priority(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            retry_count: 0,
        }
    }

    /// Builder: take timeout and retry budget from the scheduler config.
    pub fn with_defaults_from(mut self, config: &SchedulerConfig) -> Self {
        self.timeout = config.default_timeout();
        self.max_retries = config.default_max_retries;
        self
    }

    /// Builder: add a dependency.
    pub fn depends_on(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Builder: set priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Whether another retry is allowed.
    pub fn has_retry_budget(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Consume one retry. Returns the new attempt number (1-based).
    pub fn record_retry(&mut self) -> u32 {
        self.retry_count += 1;
        self.retry_count + 1
    }

    /// Blackboard key holding this task's answer.
    pub fn result_key(&self) -> String {
        result_key(&self.id)
    }

    /// Blackboard key holding this task's success flag.
    pub fn success_key(&self) -> String {
        success_key(&self.id)
    }
}

/// Blackboard key for a task's answer: `task_<id>_result`.
pub fn result_key(task_id: &str) -> String {
    format!("task_{}_result", task_id)
}

/// Blackboard key for a task's success flag: `task_<id>_success`.
pub fn success_key(task_id: &str) -> String {
    format!("task_{}_success", task_id)
}
