//! Execution hook traits for observing scheduler activity.
//!
//! Hooks receive every mode entry, task start, retry and completion. They
//! are observers: a failing hook is logged and never changes the outcome
//! of a run.
//!
//! All methods have default no-op implementations, so implementors pick
//! what they need. Receivers are `&self`; use atomics or channels for any
//! state.

use std::sync::Arc;

use crate::process::CollaborationMode;
use crate::task::SubTask;
use crate::tasks::TaskResult;

// ---------------------------------------------------------------------------
// ExecutionHook
// ---------------------------------------------------------------------------

/// Observer for scheduling runs.
///
/// # Example
///
/// ```
/// use agent_router::hooks::{ExecutionHook, HookError};
/// use agent_router::tasks::TaskResult;
///
/// struct FailureCounter;
///
/// impl ExecutionHook for FailureCounter {
///     fn on_task_complete(&self, result: &TaskResult) -> Result<(), HookError> {
///         if !result.success {
///             eprintln!("task {} failed", result.task_id);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ExecutionHook: Send + Sync + 'static {
    /// Called once when a scheduling mode starts with `task_count` tasks.
    fn on_mode_start(
        &self,
        _mode: CollaborationMode,
        _task_count: usize,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before each attempt. `attempt` is 1-based.
    fn on_task_start(&self, _task: &SubTask, _attempt: u32) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after the task's result has been written to the blackboard.
    fn on_task_complete(&self, _result: &TaskResult) -> Result<(), HookError> {
        Ok(())
    }

    /// Called when a failed task is about to be retried.
    fn on_retry(
        &self,
        _task: &SubTask,
        _attempt: u32,
        _previous: &TaskResult,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HookError
// ---------------------------------------------------------------------------

/// Error returned by a hook. Logged, never propagated.
#[derive(Debug, Clone)]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HookError: {}", self.message)
    }
}

impl std::error::Error for HookError {}

impl From<&str> for HookError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// LoggingHook
// ---------------------------------------------------------------------------

/// Emits one `key=value` log line per event. Installed by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl ExecutionHook for LoggingHook {
    fn on_mode_start(&self, mode: CollaborationMode, task_count: usize) -> Result<(), HookError> {
        log::info!("Starting collaboration mode={} tasks={}", mode, task_count);
        Ok(())
    }

    fn on_task_start(&self, task: &SubTask, attempt: u32) -> Result<(), HookError> {
        log::debug!(
            "Executing task task_id={} capability={} attempt={}",
            task.id,
            task.capability,
            attempt
        );
        Ok(())
    }

    fn on_task_complete(&self, result: &TaskResult) -> Result<(), HookError> {
        if result.success {
            log::info!(
                "Task completed task_id={} capability={} duration_ms={} success=true",
                result.task_id,
                result.capability,
                result.duration_ms()
            );
        } else {
            log::error!(
                "Task failed task_id={} capability={} duration_ms={} success=false error={}",
                result.task_id,
                result.capability,
                result.duration_ms(),
                result.error.as_deref().unwrap_or("unknown")
            );
        }
        Ok(())
    }

    fn on_retry(&self, task: &SubTask, attempt: u32, _previous: &TaskResult) -> Result<(), HookError> {
        log::warn!(
            "Retrying task task_id={} capability={} attempt={}",
            task.id,
            task.capability,
            attempt
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HookRegistry
// ---------------------------------------------------------------------------

/// Ordered set of execution hooks.
///
/// Hooks are invoked in registration order and all see the same data.
/// The registry is cheap to clone so spawned tasks can carry it.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn ExecutionHook>>,
}

impl Default for HookRegistry {
    /// A registry holding only [`LoggingHook`].
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(LoggingHook);
        registry
    }
}

impl HookRegistry {
    /// A registry with no hooks at all.
    pub fn empty() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register(&mut self, hook: impl ExecutionHook) {
        self.hooks.push(Arc::new(hook));
    }

    pub fn register_shared(&mut self, hook: Arc<dyn ExecutionHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn invoke_mode_start(&self, mode: CollaborationMode, task_count: usize) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_mode_start(mode, task_count) {
                log::warn!("ExecutionHook.on_mode_start error: {}", e);
            }
        }
    }

    pub fn invoke_task_start(&self, task: &SubTask, attempt: u32) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_task_start(task, attempt) {
                log::warn!("ExecutionHook.on_task_start error: {}", e);
            }
        }
    }

    pub fn invoke_task_complete(&self, result: &TaskResult) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_task_complete(result) {
                log::warn!("ExecutionHook.on_task_complete error: {}", e);
            }
        }
    }

    pub fn invoke_retry(&self, task: &SubTask, attempt: u32, previous: &TaskResult) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_retry(task, attempt, previous) {
                log::warn!("ExecutionHook.on_retry error: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
