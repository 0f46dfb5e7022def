//! Router: turns one inbound request into a routing decision and runs it.
//!
//! Decision order:
//!
//! 1. a registry with a single worker always gets the request;
//! 2. collaborative requests are decomposed into a [`ScheduledExecution`];
//! 3. everything else is classified: HIGH complexity goes to the planner,
//!    LOW complexity to the best-matching capability.

use std::sync::Arc;

use crate::agents::{SideChannel, WorkerOutput};
use crate::capabilities::WorkerRegistry;
use crate::hooks::ExecutionHook;
use crate::process::CollaborationMode;
use crate::scheduler::{CollaborationScheduler, ScheduledExecution};
use crate::tasks::TaskResult;
use crate::utilities::config::RouterConfig;
use crate::utilities::errors::{DecompositionError, RegistryError, RoutingError};

use super::collaboration::CollaborationDetector;
use super::decomposer::TaskDecomposer;
use super::intent::{Complexity, IntentClassifier};
use super::language::{first_sentence, normalize_text, LanguageUtility, PassthroughLanguage};

/// Label reported when neither capability model produced one.
const UNCLASSIFIED: &str = "unclassified";

/// Where a request should go.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// Hand the request to the worker registered under this tag.
    SingleWorker(String),
    /// Run these sub-tasks through the scheduler.
    ScheduledExecution(ScheduledExecution),
}

/// Result of executing a routing decision.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Single {
        capability: String,
        display_name: String,
        output: WorkerOutput,
        success: bool,
    },
    Collaborative(Vec<TaskResult>),
}

/// Top-level entry point.
pub struct Router {
    config: RouterConfig,
    registry: WorkerRegistry,
    intent: IntentClassifier,
    detector: CollaborationDetector,
    decomposer: TaskDecomposer,
    language: Arc<dyn LanguageUtility>,
    scheduler: CollaborationScheduler,
}

impl Router {
    /// Build a router over `registry`. The scheduler and decomposer are
    /// configured from `config.scheduler`.
    pub fn new(config: RouterConfig, registry: WorkerRegistry, intent: IntentClassifier) -> Self {
        let scheduler = CollaborationScheduler::new(registry.clone(), config.scheduler.clone());
        let decomposer = TaskDecomposer::with_config(&config.scheduler);
        let intent = intent.with_config(&config);
        log::info!(
            "Router ready: workers={:?} planner={} default_mode={}",
            registry.tags(),
            config.planner_capability,
            config.default_mode
        );
        Self {
            config,
            registry,
            intent,
            detector: CollaborationDetector::new(),
            decomposer,
            language: Arc::new(PassthroughLanguage),
            scheduler,
        }
    }

    /// Builder: use a real language utility for preprocessing.
    pub fn with_language(mut self, language: Arc<dyn LanguageUtility>) -> Self {
        self.language = language;
        self
    }

    /// Builder: observe scheduler activity.
    pub fn with_hook(mut self, hook: impl ExecutionHook) -> Self {
        self.scheduler = self.scheduler.with_hook(hook);
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &CollaborationScheduler {
        &self.scheduler
    }

    /// Decide where `text` goes, using the configured default mode for
    /// collaborative requests.
    pub fn route(&self, text: &str) -> Result<RoutingDecision, RoutingError> {
        self.route_with_mode(text, self.config.default_mode)
    }

    /// Decide where `text` goes; collaborative requests run in `mode`.
    pub fn route_with_mode(
        &self,
        text: &str,
        mode: CollaborationMode,
    ) -> Result<RoutingDecision, RoutingError> {
        if self.registry.is_empty() {
            return Err(RoutingError::NoWorkersRegistered);
        }
        if let Some((tag, worker)) = self.registry.sole_worker() {
            log::info!(
                "Single worker registered, routing to capability={} name={}",
                tag,
                worker.display_name()
            );
            return Ok(RoutingDecision::SingleWorker(tag.to_string()));
        }

        if self.detector.is_collaborative(text) {
            match self.decomposer.decompose(text) {
                Ok(subtasks) => {
                    log::info!(
                        "Collaborative request: mode={} subtasks={}",
                        mode,
                        subtasks.len()
                    );
                    return Ok(RoutingDecision::ScheduledExecution(ScheduledExecution::new(
                        text, subtasks, mode,
                    )));
                }
                Err(DecompositionError::Empty) => {
                    log::warn!("Collaborative request produced no sub-tasks, routing as a single task");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.route_single(text)
    }

    fn route_single(&self, text: &str) -> Result<RoutingDecision, RoutingError> {
        let text = normalize_text(
            self.language.as_ref(),
            first_sentence(text),
            &self.config.supported_languages,
        );

        if self.intent.classify_complexity(&text) == Complexity::High {
            let planner = &self.config.planner_capability;
            if !self.registry.contains(planner) {
                log::error!("Planner worker not registered: capability={}", planner);
                return Err(RegistryError::UnknownCapability(planner.clone()).into());
            }
            log::info!("Complex task detected, routing to capability={}", planner);
            return Ok(RoutingDecision::SingleWorker(planner.clone()));
        }

        let Some(label) = self.intent.classify_capability(&text, self.registry.tags()) else {
            log::error!("No agent selected: no capability classifier answered");
            return Err(RoutingError::NoAgentSelected {
                label: UNCLASSIFIED.to_string(),
            });
        };
        if !self.registry.contains(&label) {
            log::error!("No agent selected: label={} is not a registered capability", label);
            return Err(RoutingError::NoAgentSelected { label });
        }
        log::info!("Selected capability={}", label);
        Ok(RoutingDecision::SingleWorker(label))
    }

    /// Run a decision. `text` is the prompt for a single worker;
    /// `side_channel` is passed to it untouched.
    pub async fn execute(
        &self,
        text: &str,
        decision: &RoutingDecision,
        side_channel: Option<&dyn SideChannel>,
    ) -> Result<RouteOutcome, RoutingError> {
        match decision {
            RoutingDecision::SingleWorker(tag) => {
                let worker = self.registry.lookup(tag)?;
                let output = worker.process(text, side_channel).await?;
                let success = worker.last_success();
                log::info!(
                    "Worker finished: capability={} name={} success={}",
                    tag,
                    worker.display_name(),
                    success
                );
                Ok(RouteOutcome::Single {
                    capability: tag.clone(),
                    display_name: worker.display_name().to_string(),
                    output,
                    success,
                })
            }
            RoutingDecision::ScheduledExecution(execution) => {
                let results = self.scheduler.run(execution).await?;
                Ok(RouteOutcome::Collaborative(results))
            }
        }
    }

    /// Route `text` with the default mode and execute the decision.
    pub async fn handle(&self, text: &str) -> Result<RouteOutcome, RoutingError> {
        self.handle_with_mode(text, self.config.default_mode, None).await
    }

    /// Route `text` in `mode` and execute the decision.
    pub async fn handle_with_mode(
        &self,
        text: &str,
        mode: CollaborationMode,
        side_channel: Option<&dyn SideChannel>,
    ) -> Result<RouteOutcome, RoutingError> {
        let decision = self.route_with_mode(text, mode)?;
        self.execute(text, &decision, side_channel).await
    }

    /// Release classifier models. Safe to call more than once.
    pub fn shutdown(&self) {
        self.intent.teardown();
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("intent", &self.intent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::StaticWorker;
    use crate::routing::classifier::{TextClassifier, ZeroShotClassifier};
    use crate::routing::testing::{BrokenLanguage, FixedClassifier};

    struct Models {
        complexity: Arc<FixedClassifier>,
        few_shot: Arc<FixedClassifier>,
        zero_shot: Arc<FixedClassifier>,
    }

    impl Models {
        fn new(complexity: &[(&str, f64)], few_shot: &[(&str, f64)], zero_shot: &[(&str, f64)]) -> Self {
            Self {
                complexity: Arc::new(FixedClassifier::new(complexity)),
                few_shot: Arc::new(FixedClassifier::new(few_shot)),
                zero_shot: Arc::new(FixedClassifier::new(zero_shot)),
            }
        }

        fn intent(&self) -> IntentClassifier {
            let complexity: Arc<dyn TextClassifier> = self.complexity.clone();
            let few_shot: Arc<dyn TextClassifier> = self.few_shot.clone();
            let zero_shot: Arc<dyn ZeroShotClassifier> = self.zero_shot.clone();
            IntentClassifier::new(complexity, few_shot, zero_shot)
        }

        fn total_calls(&self) -> usize {
            self.complexity.calls() + self.few_shot.calls() + self.zero_shot.calls()
        }
    }

    fn full_registry() -> WorkerRegistry {
        WorkerRegistry::new()
            .with(Arc::new(StaticWorker::new("code", "Coder", "fn main() {}")))
            .with(Arc::new(StaticWorker::new("web", "Browser", "search results")))
            .with(Arc::new(StaticWorker::new("files", "File Manager", "saved")))
            .with(Arc::new(StaticWorker::new("talk", "Casual", "I'm fine, thanks!")))
            .with(Arc::new(StaticWorker::new("planner", "Planner", "a plan")))
    }

    fn low_talk() -> Models {
        Models::new(&[("LOW", 0.9)], &[("talk", 0.8)], &[("talk", 0.7)])
    }

    #[test]
    fn test_single_worker_skips_classification() {
        let models = low_talk();
        let registry = WorkerRegistry::new().with(Arc::new(StaticWorker::new("web", "Browser", "x")));
        let router = Router::new(RouterConfig::default(), registry, models.intent());

        for text in [
            "Search for Python tutorials and then write a script",
            "Hello, how are you?",
            "",
        ] {
            assert_eq!(router.route(text).unwrap(), RoutingDecision::SingleWorker("web".into()));
        }
        assert_eq!(models.total_calls(), 0);

        // The registered tag wins over the worker's own capability.
        let mut registry = WorkerRegistry::new();
        registry.register_as("helper", Arc::new(StaticWorker::new("talk", "Jarvis", "x")));
        let router = Router::new(RouterConfig::default(), registry, models.intent());
        assert_eq!(
            router.route("anything at all").unwrap(),
            RoutingDecision::SingleWorker("helper".into())
        );
    }

    #[test]
    fn test_empty_registry() {
        let router = Router::new(RouterConfig::default(), WorkerRegistry::new(), low_talk().intent());
        assert!(matches!(router.route("hi"), Err(RoutingError::NoWorkersRegistered)));
    }

    #[test]
    fn test_greeting_routes_to_talk() {
        let models = low_talk();
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent());
        assert_eq!(
            router.route("Hello, how are you?").unwrap(),
            RoutingDecision::SingleWorker("talk".into())
        );
        assert_eq!(models.complexity.calls(), 1);
        assert_eq!(models.zero_shot.calls(), 1);
    }

    #[test]
    fn test_high_complexity_routes_to_planner() {
        let models = Models::new(&[("HIGH", 0.95)], &[("code", 0.9)], &[("code", 0.9)]);
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent());
        assert_eq!(
            router.route("Plan a three week trip across Japan with a budget").unwrap(),
            RoutingDecision::SingleWorker("planner".into())
        );
        assert_eq!(models.few_shot.calls(), 0);
    }

    #[test]
    fn test_missing_planner_is_an_error() {
        let models = Models::new(&[("HIGH", 0.95)], &[], &[]);
        let registry = WorkerRegistry::new()
            .with(Arc::new(StaticWorker::new("code", "Coder", "x")))
            .with(Arc::new(StaticWorker::new("talk", "Casual", "x")));
        let router = Router::new(RouterConfig::default(), registry, models.intent());
        let err = router.route("Plan my whole quarter in detail please").unwrap_err();
        assert!(matches!(
            err,
            RoutingError::Registry(RegistryError::UnknownCapability(ref tag)) if tag == "planner"
        ));
    }

    #[test]
    fn test_unmatched_label_is_no_agent_selected() {
        let models = Models::new(&[("LOW", 0.9)], &[("mcp", 0.9)], &[("mcp", 0.6)]);
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent());
        let err = router.route("Call the weather tool for me please").unwrap_err();
        assert!(matches!(err, RoutingError::NoAgentSelected { ref label } if label == "mcp"));

        let failing = Arc::new(FixedClassifier::failing());
        let intent = IntentClassifier::new(
            Arc::new(FixedClassifier::new(&[("LOW", 0.9)])),
            failing.clone(),
            failing,
        );
        let router = Router::new(RouterConfig::default(), full_registry(), intent);
        let err = router.route("Tell me something interesting").unwrap_err();
        assert!(matches!(err, RoutingError::NoAgentSelected { ref label } if label == UNCLASSIFIED));
    }

    #[test]
    fn test_collaborative_request_is_scheduled() {
        let models = low_talk();
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent());

        let decision = router
            .route("Search for Python tutorials and then write a script")
            .unwrap();
        let RoutingDecision::ScheduledExecution(execution) = decision else {
            panic!("expected a scheduled execution");
        };
        assert_eq!(execution.mode, CollaborationMode::Sequential);
        assert!(!execution.subtasks.is_empty());
        assert!(execution
            .subtasks
            .iter()
            .any(|t| t.capability == "web" || t.capability == "code"));
        assert_eq!(models.total_calls(), 0);

        let decision = router
            .route_with_mode("Search the web. Then write a script.", CollaborationMode::Parallel)
            .unwrap();
        assert!(matches!(
            decision,
            RoutingDecision::ScheduledExecution(ref e)
                if e.mode == CollaborationMode::Parallel && e.subtasks.len() == 2
        ));
    }

    #[test]
    fn test_first_line_and_broken_language() {
        let models = Models::new(&[("LOW", 0.9)], &[("code", 0.9)], &[("code", 0.9)]);
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent())
            .with_language(Arc::new(BrokenLanguage));

        // Only "hey" is classified, so the short-text fast path applies.
        let decision = router.route("hey\nplease write a long python program").unwrap();
        assert_eq!(decision, RoutingDecision::SingleWorker("talk".into()));
        assert_eq!(models.few_shot.calls(), 0);
    }

    #[tokio::test]
    async fn test_handle_single_worker() {
        let router = Router::new(RouterConfig::default(), full_registry(), low_talk().intent());
        let outcome = router.handle("Hello, how are you?").await.unwrap();
        match outcome {
            RouteOutcome::Single { capability, display_name, output, success } => {
                assert_eq!(capability, "talk");
                assert_eq!(display_name, "Casual");
                assert_eq!(output.answer, "I'm fine, thanks!");
                assert!(success);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handle_collaborative() {
        let router = Router::new(RouterConfig::default(), full_registry(), low_talk().intent());
        let outcome = router
            .handle("Search for Rust tutorials. Then write a hello world program and save it.")
            .await
            .unwrap();
        let RouteOutcome::Collaborative(results) = outcome else {
            panic!("expected collaborative outcome");
        };
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(
            router.scheduler().blackboard().get("task_0_result", serde_json::Value::Null).await,
            "search results"
        );
    }

    #[tokio::test]
    async fn test_handle_competitive() {
        let router = Router::new(RouterConfig::default(), full_registry(), low_talk().intent());
        let outcome = router
            .handle_with_mode(
                "Search for Rust tutorials. Then write a hello world program.",
                CollaborationMode::Competitive,
                None,
            )
            .await
            .unwrap();
        let RouteOutcome::Collaborative(results) = outcome else {
            panic!("expected collaborative outcome");
        };
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
    }

    #[test]
    fn test_shutdown_tears_down_once() {
        let models = low_talk();
        let router = Router::new(RouterConfig::default(), full_registry(), models.intent());
        router.shutdown();
        router.shutdown();
        assert_eq!(models.complexity.teardowns(), 1);
        assert_eq!(models.few_shot.teardowns(), 1);
        assert_eq!(models.zero_shot.teardowns(), 1);
    }
}
