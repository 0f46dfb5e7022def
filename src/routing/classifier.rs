//! Statistical text classifier contracts.
//!
//! The router consumes two kinds of model: a [`TextClassifier`] that
//! predicts over its own label set (learned few-shot models, the complexity
//! model) and a [`ZeroShotClassifier`] that scores caller-supplied candidate
//! labels. Models are loaded by the application at startup and injected;
//! the routing core never trains or persists them beyond `add_examples`.
//!
//! [`FewShotClassifier`] is a small built-in implementation of both traits
//! based on token overlap with labelled examples.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::ClassificationError;

/// One (label, confidence) pair. Confidence is within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Highest-confidence prediction. Earlier entries win ties.
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().fold(None, |best: Option<&Prediction>, p| match best {
        Some(b) if b.confidence >= p.confidence => Some(b),
        _ => Some(p),
    })
}

/// A classifier that predicts over its own label set.
pub trait TextClassifier: Send + Sync {
    /// Predictions for `text`, in any order. May be empty.
    fn predict(&self, text: &str) -> Result<Vec<Prediction>, ClassificationError>;

    /// Teach the model labelled `(text, label)` examples. Models that cannot
    /// learn at runtime ignore this.
    fn add_examples(&self, _examples: &[(&str, &str)]) -> Result<(), ClassificationError> {
        Ok(())
    }

    /// Release model resources. Called once at shutdown.
    fn teardown(&self) {}
}

/// A classifier that scores caller-supplied candidate labels.
pub trait ZeroShotClassifier: Send + Sync {
    /// Predictions restricted to `candidate_labels`, in any order.
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<Prediction>, ClassificationError>;

    /// Release model resources. Called once at shutdown.
    fn teardown(&self) {}
}

// ---------------------------------------------------------------------------
// FewShotClassifier
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Example {
    tokens: HashSet<String>,
    label: String,
}

/// Nearest-example classifier over word (and CJK character) tokens.
///
/// Each label scores the best Jaccard similarity between the input and any
/// of its examples; scores are then normalised to sum to one.
#[derive(Debug, Default)]
pub struct FewShotClassifier {
    examples: RwLock<Vec<Example>>,
}

impl FewShotClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier pre-loaded with examples.
    pub fn with_examples(examples: &[(&str, &str)]) -> Self {
        let classifier = Self::new();
        classifier.learn(examples);
        classifier
    }

    /// Number of stored examples.
    pub fn len(&self) -> usize {
        self.examples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.read().is_empty()
    }

    fn learn(&self, examples: &[(&str, &str)]) {
        let mut store = self.examples.write();
        for (text, label) in examples {
            store.push(Example {
                tokens: tokenize(text),
                label: label.to_string(),
            });
        }
    }

    fn scores(&self, text: &str, allowed: Option<&[String]>) -> Vec<Prediction> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut best: BTreeMap<&str, f64> = BTreeMap::new();
        let store = self.examples.read();
        for example in store.iter() {
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|l| l == &example.label) {
                    continue;
                }
            }
            let score = jaccard(&tokens, &example.tokens);
            let entry = best.entry(example.label.as_str()).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        }

        let total: f64 = best.values().sum();
        if total <= 0.0 {
            return Vec::new();
        }
        let mut predictions: Vec<Prediction> = best
            .into_iter()
            .map(|(label, score)| Prediction::new(label, score / total))
            .collect();
        predictions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        predictions
    }
}

impl TextClassifier for FewShotClassifier {
    fn predict(&self, text: &str) -> Result<Vec<Prediction>, ClassificationError> {
        Ok(self.scores(text, None))
    }

    fn add_examples(&self, examples: &[(&str, &str)]) -> Result<(), ClassificationError> {
        self.learn(examples);
        Ok(())
    }

    fn teardown(&self) {
        self.examples.write().clear();
    }
}

impl ZeroShotClassifier for FewShotClassifier {
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<Prediction>, ClassificationError> {
        Ok(self.scores(text, Some(candidate_labels)))
    }

    fn teardown(&self) {
        self.examples.write().clear();
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30ff}' | '\u{3400}'..='\u{4dbf}' | '\u{4e00}'..='\u{9fff}' | '\u{ac00}'..='\u{d7af}')
}

/// Lowercased alphanumeric words; every CJK character is its own token.
fn tokenize(text: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    let mut word = String::new();
    for c in text.chars() {
        if is_cjk(c) {
            if !word.is_empty() {
                tokens.insert(std::mem::take(&mut word));
            }
            tokens.insert(c.to_string());
        } else if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
        } else if !word.is_empty() {
            tokens.insert(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        tokens.insert(word);
    }
    tokens
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prediction_clamped() {
        assert_eq!(Prediction::new("x", 1.7).confidence, 1.0);
        assert_eq!(Prediction::new("x", -0.2).confidence, 0.0);
    }

    #[test]
    fn test_top_prediction_prefers_first_on_tie() {
        let preds = vec![
            Prediction::new("a", 0.4),
            Prediction::new("b", 0.6),
            Prediction::new("c", 0.6),
        ];
        assert_eq!(top_prediction(&preds).unwrap().label, "b");
        assert!(top_prediction(&[]).is_none());
    }

    #[test]
    fn test_tokenize_mixed_scripts() {
        let tokens = tokenize("Search 搜尋 the Web!");
        assert!(tokens.contains("search"));
        assert!(tokens.contains("web"));
        assert!(tokens.contains("搜"));
        assert!(tokens.contains("尋"));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_few_shot_predicts_nearest_label() {
        let classifier = FewShotClassifier::with_examples(&[
            ("write a python script", "code"),
            ("search the web for news", "web"),
            ("hey how are you", "talk"),
        ]);
        let preds = classifier.predict("Hello, how are you?").unwrap();
        assert_eq!(preds[0].label, "talk");
        let total: f64 = preds.iter().map(|p| p.confidence).sum();
        assert!((total - 1.0).abs() < 1e-9);

        let preds = classifier.predict("search the web for tutorials").unwrap();
        assert_eq!(preds[0].label, "web");
    }

    #[test]
    fn test_few_shot_no_overlap_is_empty() {
        let classifier = FewShotClassifier::with_examples(&[("write code", "code")]);
        assert!(classifier.predict("bonjour").unwrap().is_empty());
        assert!(classifier.predict("").unwrap().is_empty());
    }

    #[test]
    fn test_zero_shot_restricted_to_candidates() {
        let classifier = FewShotClassifier::with_examples(&[
            ("write a python script", "code"),
            ("write a letter to grandma", "talk"),
        ]);
        let preds = classifier
            .classify("write a letter", &labels(&["code"]))
            .unwrap();
        assert_eq!(preds.len(), 1);
        assert_eq!(preds[0].label, "code");
        assert_eq!(preds[0].confidence, 1.0);
    }

    #[test]
    fn test_add_examples_and_teardown() {
        let classifier = FewShotClassifier::new();
        assert!(classifier.is_empty());
        TextClassifier::add_examples(&classifier, &[("hi", "talk"), ("find file", "files")])
            .unwrap();
        assert_eq!(classifier.len(), 2);
        TextClassifier::teardown(&classifier);
        assert!(classifier.is_empty());
    }
}
