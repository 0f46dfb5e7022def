//! # Agent Router
//!
//! Task routing and multi-agent collaboration for a personal-assistant
//! backend.
//!
//! A request is either handed to one specialised worker (chosen by an
//! intent classifier) or, when it describes several cooperating steps,
//! decomposed into sub-tasks that a collaboration scheduler runs against
//! the registered workers. Sub-tasks share intermediate results through a
//! blackboard and can run sequentially, in parallel, in dependency order
//! or competitively.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use agent_router::agents::StaticWorker;
//! use agent_router::routing::{FewShotClassifier, IntentClassifier, Router};
//! use agent_router::{RouterConfig, WorkerRegistry};
//!
//! # async fn demo() -> Result<(), agent_router::RoutingError> {
//! let registry = WorkerRegistry::new()
//!     .with(Arc::new(StaticWorker::new("talk", "Casual", "Hi there!")))
//!     .with(Arc::new(StaticWorker::new("web", "Browser", "Found it.")));
//! let complexity = Arc::new(FewShotClassifier::new());
//! let capability = Arc::new(FewShotClassifier::new());
//! let intent = IntentClassifier::new(complexity, capability.clone(), capability);
//! intent.seed_examples().ok();
//!
//! let router = Router::new(RouterConfig::default(), registry, intent);
//! let outcome = router.handle("Hello, how are you?").await?;
//! println!("{:?}", outcome);
//! router.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod blackboard;
pub mod capabilities;
pub mod hooks;
pub mod process;
pub mod routing;
pub mod scheduler;
pub mod task;
pub mod tasks;
pub mod utilities;

pub use agents::{Worker, WorkerError, WorkerOutput};
pub use blackboard::SharedBlackboard;
pub use capabilities::WorkerRegistry;
pub use process::CollaborationMode;
pub use routing::{RouteOutcome, Router, RoutingDecision};
pub use scheduler::{CollaborationScheduler, ScheduledExecution};
pub use task::SubTask;
pub use tasks::TaskResult;
pub use utilities::config::{RouterConfig, SchedulerConfig};
pub use utilities::errors::{RoutingError, SchedulerError};
