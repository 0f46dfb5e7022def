//! Request routing.
//!
//! The [`Router`] combines the [`CollaborationDetector`], the
//! [`TaskDecomposer`] and the [`IntentClassifier`] to turn one request into
//! a [`RoutingDecision`]: either a single worker or a scheduled
//! multi-task execution.

pub mod classifier;
pub mod collaboration;
pub mod decomposer;
pub mod few_shots;
pub mod intent;
pub mod language;
pub mod router;

#[cfg(test)]
mod testing;

pub use classifier::{FewShotClassifier, Prediction, TextClassifier, ZeroShotClassifier};
pub use collaboration::{CollaborationAnalysis, CollaborationDetector};
pub use decomposer::TaskDecomposer;
pub use intent::{Complexity, IntentClassifier};
pub use language::{LanguageUtility, PassthroughLanguage};
pub use router::{RouteOutcome, Router, RoutingDecision};
