//! Collaboration scheduler: runs decomposed sub-tasks against registered
//! workers.
//!
//! Four execution modes are supported:
//!
//! - **Sequential**: list order, a fresh blackboard snapshot before each
//!   task, at most one immediate retry per failed task.
//! - **Parallel**: every task sees one snapshot taken before the batch;
//!   admission is bounded by a semaphore of `max_parallel_tasks` permits.
//! - **Pipeline**: dependency order, then the sequential procedure. A task
//!   whose dependency failed is failed without running its worker.
//! - **Competitive**: one description against several capabilities in
//!   parallel; the fastest successful result wins.
//!
//! A task's failure, timeout or panic is always contained in its own
//! [`TaskResult`]; a batch returns one result per submitted task.

pub mod graph;
pub mod prompt;

use std::any::Any;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::blackboard::{SharedBlackboard, Snapshot};
use crate::capabilities::WorkerRegistry;
use crate::hooks::{ExecutionHook, HookRegistry};
use crate::process::CollaborationMode;
use crate::task::{result_key, success_key, SubTask};
use crate::tasks::TaskResult;
use crate::utilities::config::{BlackboardScope, SchedulerConfig};
use crate::utilities::errors::SchedulerError;

use self::graph::GraphError;

/// A decomposed request waiting to be run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledExecution {
    /// The request text the sub-tasks were derived from.
    pub request: String,
    pub subtasks: Vec<SubTask>,
    pub mode: CollaborationMode,
}

impl ScheduledExecution {
    pub fn new(request: impl Into<String>, subtasks: Vec<SubTask>, mode: CollaborationMode) -> Self {
        Self {
            request: request.into(),
            subtasks,
            mode,
        }
    }

    /// Distinct capability tags in first-seen order.
    pub fn capabilities(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for task in &self.subtasks {
            if !tags.contains(&task.capability) {
                tags.push(task.capability.clone());
            }
        }
        tags
    }
}

/// Everything one attempt needs. Shared with spawned tasks.
#[derive(Clone)]
struct TaskRunner {
    registry: WorkerRegistry,
    blackboard: SharedBlackboard,
    hooks: HookRegistry,
    preview_chars: usize,
}

impl TaskRunner {
    /// Run one attempt of `task` against `context`, publish the result and
    /// notify hooks.
    async fn attempt(&self, task: &SubTask, context: &Snapshot, attempt: u32) -> TaskResult {
        self.hooks.invoke_task_start(task, attempt);
        let start = Instant::now();

        let result = match self.registry.lookup(&task.capability) {
            Ok(worker) => {
                let prompt = prompt::build_prompt(&task.description, context, self.preview_chars);
                let call = AssertUnwindSafe(worker.process(&prompt, None)).catch_unwind();
                match tokio::time::timeout(task.timeout, call).await {
                    Ok(Ok(Ok(output))) => {
                        TaskResult::from_output(task, output, worker.last_success(), start.elapsed())
                    }
                    Ok(Ok(Err(e))) => TaskResult::failed(task, e.to_string(), start.elapsed()),
                    Ok(Err(payload)) => TaskResult::failed(
                        task,
                        format!("worker panicked: {}", panic_message(&*payload)),
                        start.elapsed(),
                    ),
                    Err(_) => TaskResult::failed(
                        task,
                        format!("timed out after {:.1}s", task.timeout.as_secs_f64()),
                        start.elapsed(),
                    ),
                }
            }
            Err(e) => TaskResult::failed(task, e.to_string(), start.elapsed()),
        };

        self.complete(result).await
    }

    /// Publish `result` and notify hooks.
    async fn complete(&self, result: TaskResult) -> TaskResult {
        self.blackboard
            .set_from(&result.task_id, result_key(&result.task_id), result.result.clone())
            .await;
        self.blackboard
            .set_from(&result.task_id, success_key(&result.task_id), result.success)
            .await;
        self.hooks.invoke_task_complete(&result);
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Drives sub-task execution for one registry and one blackboard.
///
/// The blackboard lives as long as the scheduler. With
/// [`BlackboardScope::Scheduler`] context accumulates across runs; with
/// [`BlackboardScope::Run`] it is cleared at the start of each run.
pub struct CollaborationScheduler {
    runner: Arc<TaskRunner>,
    gate: Arc<Semaphore>,
    config: SchedulerConfig,
}

impl CollaborationScheduler {
    /// Create a scheduler with a fresh blackboard and the logging hook.
    pub fn new(registry: WorkerRegistry, config: SchedulerConfig) -> Self {
        let permits = config.max_parallel_tasks.max(1);
        Self {
            runner: Arc::new(TaskRunner {
                registry,
                blackboard: SharedBlackboard::new(),
                hooks: HookRegistry::default(),
                preview_chars: config.context_preview_chars,
            }),
            gate: Arc::new(Semaphore::new(permits)),
            config,
        }
    }

    /// Builder: use an existing blackboard.
    pub fn with_blackboard(mut self, blackboard: SharedBlackboard) -> Self {
        Arc::make_mut(&mut self.runner).blackboard = blackboard;
        self
    }

    /// Builder: add an execution hook after the default ones.
    pub fn with_hook(mut self, hook: impl ExecutionHook) -> Self {
        Arc::make_mut(&mut self.runner).hooks.register(hook);
        self
    }

    /// Builder: replace all hooks.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        Arc::make_mut(&mut self.runner).hooks = hooks;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.runner.registry
    }

    pub fn blackboard(&self) -> &SharedBlackboard {
        &self.runner.blackboard
    }

    /// Drop all accumulated context.
    pub async fn clear_blackboard(&self) {
        self.runner.blackboard.clear().await;
    }

    /// Run a scheduled execution in its mode.
    ///
    /// Competitive mode races the whole request across the distinct
    /// capabilities of the sub-tasks; with fewer than two it runs the
    /// sub-tasks sequentially instead.
    pub async fn run(&self, execution: &ScheduledExecution) -> Result<Vec<TaskResult>, SchedulerError> {
        let run_id = Uuid::new_v4();
        log::info!(
            "Scheduled execution run_id={} mode={} tasks={}",
            run_id,
            execution.mode,
            execution.subtasks.len()
        );

        let results = match execution.mode {
            CollaborationMode::Sequential => self.execute_sequential(&execution.subtasks).await?,
            CollaborationMode::Parallel => self.execute_parallel(&execution.subtasks).await?,
            CollaborationMode::Pipeline => self.execute_pipeline(&execution.subtasks).await?,
            CollaborationMode::Competitive => {
                let candidates = execution.capabilities();
                if candidates.len() > 1 {
                    vec![self.execute_competitive(&execution.request, &candidates).await?]
                } else {
                    self.execute_sequential(&execution.subtasks).await?
                }
            }
        };

        let succeeded = results.iter().filter(|r| r.success).count();
        log::info!(
            "Scheduled execution finished run_id={} succeeded={} failed={}",
            run_id,
            succeeded,
            results.len() - succeeded
        );
        Ok(results)
    }

    /// Run tasks one after another in list order.
    pub async fn execute_sequential(&self, tasks: &[SubTask]) -> Result<Vec<TaskResult>, SchedulerError> {
        self.begin(CollaborationMode::Sequential, tasks).await?;
        Ok(self.run_in_order(tasks.to_vec(), false).await)
    }

    /// Run tasks concurrently against one shared snapshot.
    ///
    /// Higher-priority tasks are admitted first. Results come back in
    /// input order.
    pub async fn execute_parallel(&self, tasks: &[SubTask]) -> Result<Vec<TaskResult>, SchedulerError> {
        self.begin(CollaborationMode::Parallel, tasks).await?;
        Ok(self.run_concurrently(tasks).await)
    }

    /// Run tasks in dependency order using the sequential procedure.
    ///
    /// Results come back in execution order.
    pub async fn execute_pipeline(&self, tasks: &[SubTask]) -> Result<Vec<TaskResult>, SchedulerError> {
        let dupes = graph::duplicate_ids(tasks);
        if !dupes.is_empty() {
            log::warn!("Pipeline has duplicate task ids: {:?}", dupes);
        }
        let ordered = graph::topological_order(tasks).map_err(|e| match e {
            GraphError::Cycle(task_id) => SchedulerError::CyclicDependency { task_id },
        })?;

        self.begin(CollaborationMode::Pipeline, &ordered).await?;
        Ok(self.run_in_order(ordered, true).await)
    }

    /// Race `description` across `candidates` and keep the best result.
    ///
    /// The winner is the successful result with the shortest duration; if
    /// nothing succeeded, the first candidate's result.
    pub async fn execute_competitive(
        &self,
        description: &str,
        candidates: &[String],
    ) -> Result<TaskResult, SchedulerError> {
        if candidates.is_empty() {
            return Err(SchedulerError::NoCandidates);
        }
        let tasks: Vec<SubTask> = candidates
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                SubTask::new(format!("competitive_{}", i), tag.clone(), description)
                    .with_defaults_from(&self.config)
            })
            .collect();

        self.begin(CollaborationMode::Competitive, &tasks).await?;
        let results = if tasks.len() == 1 {
            self.run_in_order(tasks, false).await
        } else {
            self.run_concurrently(&tasks).await
        };

        let winner = results
            .iter()
            .filter(|r| r.success)
            .min_by_key(|r| r.duration)
            .or_else(|| results.first())
            .cloned()
            .ok_or(SchedulerError::NoCandidates)?;
        log::info!(
            "Competitive winner task_id={} capability={} duration_ms={} success={}",
            winner.task_id,
            winner.capability,
            winner.duration_ms(),
            winner.success
        );
        Ok(winner)
    }

    /// Validate capabilities, apply the blackboard scope and announce the mode.
    async fn begin(&self, mode: CollaborationMode, tasks: &[SubTask]) -> Result<(), SchedulerError> {
        for task in tasks {
            self.runner.registry.lookup(&task.capability)?;
        }
        if self.config.blackboard_scope == BlackboardScope::Run {
            self.runner.blackboard.clear().await;
        }
        self.runner.hooks.invoke_mode_start(mode, tasks.len());
        Ok(())
    }

    async fn run_in_order(&self, tasks: Vec<SubTask>, gate_on_dependencies: bool) -> Vec<TaskResult> {
        let mut outcomes: HashMap<String, bool> = HashMap::with_capacity(tasks.len());
        let mut results = Vec::with_capacity(tasks.len());

        for mut task in tasks {
            if gate_on_dependencies {
                if let Some(dep) = task
                    .dependencies
                    .iter()
                    .find(|dep| outcomes.get(dep.as_str()) == Some(&false))
                {
                    let error = format!("dependency '{}' did not complete successfully", dep);
                    let result = self
                        .runner
                        .complete(TaskResult::failed(&task, error, Default::default()))
                        .await;
                    outcomes.insert(task.id.clone(), false);
                    results.push(result);
                    continue;
                }
            }

            let context = self.runner.blackboard.get_all().await;
            let mut result = self.runner.attempt(&task, &context, 1).await;
            if !result.success && task.has_retry_budget() {
                let attempt = task.record_retry();
                self.runner.hooks.invoke_retry(&task, attempt, &result);
                result = self.runner.attempt(&task, &context, attempt).await;
            }
            outcomes.insert(task.id.clone(), result.success);
            results.push(result);
        }
        results
    }

    async fn run_concurrently(&self, tasks: &[SubTask]) -> Vec<TaskResult> {
        let context = Arc::new(self.runner.blackboard.get_all().await);
        log::debug!(
            "Parallel batch tasks={} snapshot_keys={} max_parallel={}",
            tasks.len(),
            context.len(),
            self.config.max_parallel_tasks
        );

        let mut admission: Vec<usize> = (0..tasks.len()).collect();
        admission.sort_by_key(|&i| Reverse(tasks[i].priority));

        let mut slots: Vec<Option<TaskResult>> = vec![None; tasks.len()];
        let mut handles = Vec::with_capacity(tasks.len());
        for i in admission {
            let task = tasks[i].clone();
            let permit = match self.gate.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    let failed = TaskResult::failed(&task, e.to_string(), Default::default());
                    slots[i] = Some(self.runner.complete(failed).await);
                    continue;
                }
            };
            let runner = Arc::clone(&self.runner);
            let context = Arc::clone(&context);
            let handle = tokio::spawn(async move {
                let result = runner.attempt(&task, &context, 1).await;
                drop(permit);
                result
            });
            handles.push((i, handle));
        }

        let (indices, handles): (Vec<usize>, Vec<_>) = handles.into_iter().unzip();
        let joined = futures::future::join_all(handles).await;
        for (i, outcome) in indices.into_iter().zip(joined) {
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    let failed = TaskResult::failed(
                        &tasks[i],
                        format!("task aborted: {}", e),
                        Default::default(),
                    );
                    self.runner.complete(failed).await
                }
            };
            slots[i] = Some(result);
        }

        slots
            .into_iter()
            .zip(tasks)
            .map(|(slot, task)| {
                slot.unwrap_or_else(|| {
                    TaskResult::failed(task, "task produced no result", Default::default())
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for CollaborationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaborationScheduler")
            .field("workers", &self.runner.registry.tags())
            .field("hooks", &self.runner.hooks)
            .field("config", &self.config)
            .finish()
    }
}
