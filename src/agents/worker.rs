//! The worker contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Answer and reasoning trace returned by one `process` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOutput {
    /// The text answer.
    pub answer: String,
    /// Free-form reasoning trace.
    pub reasoning: String,
}

impl WorkerOutput {
    pub fn new(answer: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// Failure raised from inside a worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// The worker ran but could not complete the request.
    #[error("Worker failed: {0}")]
    Failed(String),

    /// A resource the worker depends on is unavailable.
    #[error("Worker unavailable: {0}")]
    Unavailable(String),
}

/// Out-of-band channel a worker may use while processing, e.g. to speak
/// progress updates. Workers must tolerate its absence.
pub trait SideChannel: Send + Sync {
    /// Deliver a message to the user.
    fn notify(&self, message: &str);
}

/// A capability provider.
///
/// Implementations keep their own "last result" state behind interior
/// mutability; the scheduler reads [`Worker::last_success`] right after
/// `process` returns.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Capability tag this worker handles (e.g. `"code"`).
    fn capability(&self) -> &str;

    /// Human-readable name.
    fn display_name(&self) -> &str;

    /// Handle one prompt. May take seconds to minutes.
    async fn process(
        &self,
        prompt: &str,
        side_channel: Option<&dyn SideChannel>,
    ) -> Result<WorkerOutput, WorkerError>;

    /// Whether the most recent `process` call succeeded.
    fn last_success(&self) -> bool;

    /// Output of the most recent `process` call, if the worker keeps it.
    fn last_output(&self) -> Option<WorkerOutput> {
        None
    }
}
