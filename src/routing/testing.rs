//! Classifier stubs shared by the routing tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::classifier::{Prediction, TextClassifier, ZeroShotClassifier};
use super::language::LanguageUtility;
use crate::utilities::errors::{ClassificationError, LanguageError};

/// Returns fixed predictions and counts calls.
#[derive(Debug, Default)]
pub struct FixedClassifier {
    predictions: Vec<Prediction>,
    error: Option<ClassificationError>,
    calls: AtomicUsize,
    teardowns: AtomicUsize,
}

impl FixedClassifier {
    pub fn new(predictions: &[(&str, f64)]) -> Self {
        Self {
            predictions: predictions
                .iter()
                .map(|(label, conf)| Prediction::new(*label, *conf))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            error: Some(ClassificationError::Model("model not loaded".into())),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<Vec<Prediction>, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.predictions.clone()),
        }
    }
}

impl TextClassifier for FixedClassifier {
    fn predict(&self, _text: &str) -> Result<Vec<Prediction>, ClassificationError> {
        self.answer()
    }

    fn teardown(&self) {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

impl ZeroShotClassifier for FixedClassifier {
    fn classify(
        &self,
        _text: &str,
        _candidate_labels: &[String],
    ) -> Result<Vec<Prediction>, ClassificationError> {
        self.answer()
    }

    fn teardown(&self) {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// Language utility whose every call fails.
#[derive(Debug, Default)]
pub struct BrokenLanguage;

impl LanguageUtility for BrokenLanguage {
    fn detect_language(&self, _text: &str) -> Result<String, LanguageError> {
        Err(LanguageError::Detection("no model".into()))
    }

    fn translate(&self, _text: &str, _from: &str) -> Result<String, LanguageError> {
        Err(LanguageError::Translation("no model".into()))
    }
}
