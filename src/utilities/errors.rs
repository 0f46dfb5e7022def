//! Error types for routing, scheduling and configuration.

use thiserror::Error;

use crate::agents::WorkerError;

/// Errors from the worker registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No worker is registered under the requested capability tag.
    #[error("Unknown capability: no worker registered for '{0}'")]
    UnknownCapability(String),
}

/// Errors raised by a statistical classifier.
///
/// These never escape routing: the intent classifier recovers from them
/// with fixed defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The underlying model failed.
    #[error("Classifier model error: {0}")]
    Model(String),

    /// The model returned no predictions.
    #[error("Classifier returned no predictions")]
    Empty,
}

/// Errors from the language utility. Routing continues on the
/// untranslated text when these occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("Language detection failed: {0}")]
    Detection(String),

    #[error("Translation failed: {0}")]
    Translation(String),
}

/// Errors from task decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompositionError {
    /// The request produced zero sub-tasks.
    #[error("Task decomposition produced no sub-tasks")]
    Empty,

    /// The dependency graph contains a cycle through this task.
    #[error("Cyclic dependency detected at task '{task_id}'")]
    CyclicDependency { task_id: String },
}

/// Errors from the collaboration scheduler.
///
/// Per-task failures are never reported here; they become failed
/// `TaskResult`s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Competitive execution was requested with no candidate tags.
    #[error("Competitive execution requires at least one candidate capability")]
    NoCandidates,

    /// A sub-task names a capability with no registered worker.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Pipeline input contains a dependency cycle.
    #[error("Cyclic dependency detected at task '{task_id}'")]
    CyclicDependency { task_id: String },
}

/// Errors surfaced by the router.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The registry has no workers at all.
    #[error("No workers registered")]
    NoWorkersRegistered,

    /// No registered worker matches the classifier output.
    #[error("No agent selected for request (classified as '{label}')")]
    NoAgentSelected { label: String },

    /// A routing decision referenced an unregistered capability.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Decomposition failed in a way that cannot fall back.
    #[error(transparent)]
    Decomposition(#[from] DecompositionError),

    /// Scheduling rejected its input.
    #[error(transparent)]
    Scheduling(#[from] SchedulerError),

    /// The selected single worker failed.
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_converts_into_routing_error() {
        let err: RoutingError = RegistryError::UnknownCapability("web".into()).into();
        assert!(matches!(
            err,
            RoutingError::Registry(RegistryError::UnknownCapability(ref tag)) if tag == "web"
        ));
        assert_eq!(err.to_string(), "Unknown capability: no worker registered for 'web'");
    }

    #[test]
    fn test_cycle_message_names_task() {
        let err = DecompositionError::CyclicDependency { task_id: "task_2".into() };
        assert!(err.to_string().contains("task_2"));
    }
}
