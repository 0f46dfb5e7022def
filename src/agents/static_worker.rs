//! A worker with a fixed, configurable behaviour.
//!
//! Used by the demo binary in place of real LLM-backed workers, and by
//! tests that need a predictable capability provider.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::worker::{SideChannel, Worker, WorkerError, WorkerOutput};

#[derive(Debug, Default)]
struct LastRun {
    output: Option<WorkerOutput>,
    success: bool,
    prompts: Vec<String>,
}

/// Worker that answers every prompt with the same text.
#[derive(Debug)]
pub struct StaticWorker {
    capability: String,
    name: String,
    answer: String,
    delay: Option<Duration>,
    /// Report `last_success == false` after answering.
    unsuccessful: bool,
    /// Raise this error instead of answering.
    error: Option<WorkerError>,
    state: Mutex<LastRun>,
}

impl StaticWorker {
    /// Create a worker that always answers `answer`.
    pub fn new(
        capability: impl Into<String>,
        name: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            capability: capability.into(),
            name: name.into(),
            answer: answer.into(),
            delay: None,
            unsuccessful: false,
            error: None,
            state: Mutex::new(LastRun::default()),
        }
    }

    /// Builder: sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Builder: answer but report the run as unsuccessful.
    pub fn unsuccessful(mut self) -> Self {
        self.unsuccessful = true;
        self
    }

    /// Builder: fail every call with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(WorkerError::Failed(message.into()));
        self
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    /// Number of `process` calls so far.
    pub fn calls(&self) -> usize {
        self.state.lock().prompts.len()
    }
}

#[async_trait]
impl Worker for StaticWorker {
    fn capability(&self) -> &str {
        &self.capability
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    async fn process(
        &self,
        prompt: &str,
        side_channel: Option<&dyn SideChannel>,
    ) -> Result<WorkerOutput, WorkerError> {
        self.state.lock().prompts.push(prompt.to_string());
        if let Some(channel) = side_channel {
            channel.notify(&format!("{} is working on it", self.name));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if let Some(err) = &self.error {
            state.success = false;
            state.output = None;
            return Err(err.clone());
        }

        let output = WorkerOutput::new(
            self.answer.clone(),
            format!("{} answered with a fixed response", self.name),
        );
        state.success = !self.unsuccessful;
        state.output = Some(output.clone());
        Ok(output)
    }

    fn last_success(&self) -> bool {
        self.state.lock().success
    }

    fn last_output(&self) -> Option<WorkerOutput> {
        self.state.lock().output.clone()
    }
}
