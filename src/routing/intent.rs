//! Intent classification: complexity tier and best-fit capability for a request.
//!
//! Both decisions are pure functions of the text and the injected models.
//! Model failures never escape: complexity falls back to [`Complexity::Low`],
//! and capability voting uses whichever model still answered.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::classifier::{top_prediction, Prediction, TextClassifier, ZeroShotClassifier};
use super::few_shots::{CAPABILITY_EXAMPLES, COMPLEXITY_EXAMPLES};
use crate::utilities::config::RouterConfig;
use crate::utilities::errors::ClassificationError;

/// Label the complexity model uses for simple requests.
pub const LOW_LABEL: &str = "LOW";
/// Label the complexity model uses for requests that need planning.
pub const HIGH_LABEL: &str = "HIGH";

/// Complexity tier of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Complexity {
    Low,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "{}", LOW_LABEL),
            Complexity::High => write!(f, "{}", HIGH_LABEL),
        }
    }
}

/// Classifies requests by complexity and capability.
///
/// Constructed once at startup with its models and torn down once at
/// shutdown; no model state is global.
pub struct IntentClassifier {
    complexity: Arc<dyn TextClassifier>,
    few_shot: Arc<dyn TextClassifier>,
    zero_shot: Arc<dyn ZeroShotClassifier>,
    talk_capability: String,
    short_text_threshold: usize,
    confidence_threshold: f64,
    torn_down: AtomicBool,
}

impl fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("talk_capability", &self.talk_capability)
            .field("short_text_threshold", &self.short_text_threshold)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish()
    }
}

impl IntentClassifier {
    /// Create a classifier from its three models with default thresholds.
    pub fn new(
        complexity: Arc<dyn TextClassifier>,
        few_shot: Arc<dyn TextClassifier>,
        zero_shot: Arc<dyn ZeroShotClassifier>,
    ) -> Self {
        let defaults = RouterConfig::default();
        Self {
            complexity,
            few_shot,
            zero_shot,
            talk_capability: defaults.talk_capability,
            short_text_threshold: defaults.short_text_threshold,
            confidence_threshold: defaults.complexity_confidence_threshold,
            torn_down: AtomicBool::new(false),
        }
    }

    /// Builder: take thresholds and the talk tag from the router config.
    pub fn with_config(mut self, config: &RouterConfig) -> Self {
        self.talk_capability = config.talk_capability.clone();
        self.short_text_threshold = config.short_text_threshold;
        self.confidence_threshold = config.complexity_confidence_threshold;
        self
    }

    /// Teach the complexity and few-shot models the built-in examples.
    pub fn seed_examples(&self) -> Result<(), ClassificationError> {
        self.complexity.add_examples(COMPLEXITY_EXAMPLES)?;
        self.few_shot.add_examples(CAPABILITY_EXAMPLES)?;
        log::info!(
            "Seeded classifiers: complexity_examples={} capability_examples={}",
            COMPLEXITY_EXAMPLES.len(),
            CAPABILITY_EXAMPLES.len()
        );
        Ok(())
    }

    /// Estimate the complexity tier of `text`.
    ///
    /// Low confidence fails toward [`Complexity::High`] (the more capable
    /// path). A model error or an empty prediction list gives
    /// [`Complexity::Low`].
    pub fn classify_complexity(&self, text: &str) -> Complexity {
        let top = match best_prediction(self.complexity.predict(text)) {
            Ok(top) => top,
            Err(e) => {
                log::warn!("Complexity classification failed, defaulting to LOW: {}", e);
                return Complexity::Low;
            }
        };

        if top.confidence < self.confidence_threshold {
            log::info!(
                "Low confidence in complexity estimation: label={} confidence={:.3}, routing as HIGH",
                top.label,
                top.confidence
            );
            return Complexity::High;
        }
        match top.label.as_str() {
            HIGH_LABEL => Complexity::High,
            LOW_LABEL => Complexity::Low,
            other => {
                log::warn!("Unexpected complexity label '{}', defaulting to LOW", other);
                Complexity::Low
            }
        }
    }

    /// Pick the best capability tag for `text` among `candidate_tags`.
    ///
    /// Texts of at most `short_text_threshold` characters go straight to the
    /// talk tag. Otherwise both models vote and the one with the larger
    /// normalised weight `conf / (conf_few_shot + conf_zero_shot)` wins; the
    /// few-shot model wins ties. If one model fails the other decides alone;
    /// if both fail, `None`.
    pub fn classify_capability(&self, text: &str, candidate_tags: &[String]) -> Option<String> {
        if text.chars().count() <= self.short_text_threshold {
            log::debug!("Short text fast-path: capability={}", self.talk_capability);
            return Some(self.talk_capability.clone());
        }

        let few_shot = self.few_shot_vote(text);
        let zero_shot = self.zero_shot_vote(text, candidate_tags);

        match (few_shot, zero_shot) {
            (Some(a), Some(b)) => {
                let (weight_a, weight_b) = normalized_weights(a.confidence, b.confidence);
                log::info!(
                    "Routing vote: few_shot={} ({:.3}) zero_shot={} ({:.3})",
                    a.label,
                    weight_a,
                    b.label,
                    weight_b
                );
                if weight_b > weight_a {
                    Some(b.label)
                } else {
                    Some(a.label)
                }
            }
            (Some(only), None) | (None, Some(only)) => {
                log::info!("Routing vote with a single model: label={}", only.label);
                Some(only.label)
            }
            (None, None) => {
                log::error!("Both capability classifiers failed for request");
                None
            }
        }
    }

    fn few_shot_vote(&self, text: &str) -> Option<Prediction> {
        let predictions = self.few_shot.predict(text).map(|predictions| {
            predictions
                .into_iter()
                .filter(|p| p.label != HIGH_LABEL && p.label != LOW_LABEL)
                .collect::<Vec<_>>()
        });
        match best_prediction(predictions) {
            Ok(top) => Some(top),
            Err(e) => {
                log::warn!("Few-shot capability classifier failed: {}", e);
                None
            }
        }
    }

    fn zero_shot_vote(&self, text: &str, candidate_tags: &[String]) -> Option<Prediction> {
        match best_prediction(self.zero_shot.classify(text, candidate_tags)) {
            Ok(top) => Some(top),
            Err(e) => {
                log::warn!("Zero-shot capability classifier failed: {}", e);
                None
            }
        }
    }

    /// Release every model. Only the first call has an effect.
    pub fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.complexity.teardown();
        self.few_shot.teardown();
        self.zero_shot.teardown();
        log::info!("Classifier models released");
    }
}

/// Highest-confidence prediction; an empty list is [`ClassificationError::Empty`].
fn best_prediction(
    predictions: Result<Vec<Prediction>, ClassificationError>,
) -> Result<Prediction, ClassificationError> {
    top_prediction(&predictions?)
        .cloned()
        .ok_or(ClassificationError::Empty)
}

/// `(a / (a + b), b / (a + b))`, or an even split when both are zero.
fn normalized_weights(a: f64, b: f64) -> (f64, f64) {
    let total = a + b;
    if total <= 0.0 {
        return (0.5, 0.5);
    }
    (a / total, b / total)
}
