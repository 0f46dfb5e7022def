//! Resolves capability tags to worker instances.
//!
//! Pure lookup table. Workers are owned by the application; the registry
//! only holds shared handles, and cloning it is cheap.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::agents::Worker;
use crate::utilities::errors::RegistryError;

/// Maps capability tags to workers, remembering registration order.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    /// Workers indexed by capability tag.
    workers: HashMap<String, Arc<dyn Worker>>,

    /// Tags in registration order (used as classifier candidate labels).
    order: Vec<String>,
}

impl fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("tags", &self.order)
            .finish()
    }
}

impl WorkerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker under its own capability tag.
    pub fn register(&mut self, worker: Arc<dyn Worker>) {
        let tag = worker.capability().to_string();
        self.register_as(tag, worker);
    }

    /// Register a worker under an explicit tag, replacing any previous one.
    pub fn register_as(&mut self, tag: impl Into<String>, worker: Arc<dyn Worker>) {
        let tag = tag.into();
        log::debug!(
            "Registered worker: capability={} name={}",
            tag,
            worker.display_name()
        );
        if self.workers.insert(tag.clone(), worker).is_none() {
            self.order.push(tag);
        }
    }

    /// Builder: register a worker and return the registry.
    pub fn with(mut self, worker: Arc<dyn Worker>) -> Self {
        self.register(worker);
        self
    }

    /// Resolve a tag to its worker.
    pub fn lookup(&self, tag: &str) -> Result<Arc<dyn Worker>, RegistryError> {
        self.workers
            .get(tag)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownCapability(tag.to_string()))
    }

    /// Check whether a tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.workers.contains_key(tag)
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> &[String] {
        &self.order
    }

    /// The registered tag and worker, if exactly one is registered.
    pub fn sole_worker(&self) -> Option<(&str, &Arc<dyn Worker>)> {
        match self.order.as_slice() {
            [only] => self
                .workers
                .get(only)
                .map(|worker| (only.as_str(), worker)),
            _ => None,
        }
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::StaticWorker;
    use crate::capabilities::tags;

    #[test]
    fn test_register_and_lookup() {
        let registry = WorkerRegistry::new()
            .with(Arc::new(StaticWorker::new(tags::CODE, "Coder", "done")))
            .with(Arc::new(StaticWorker::new(tags::WEB, "Browser", "found")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tags(), &["code".to_string(), "web".to_string()]);
        assert_eq!(registry.lookup("web").unwrap().display_name(), "Browser");
        assert!(registry.contains("code"));
    }

    #[test]
    fn test_unknown_capability() {
        let registry = WorkerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.lookup("files").err(),
            Some(RegistryError::UnknownCapability("files".into()))
        );
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut registry = WorkerRegistry::new();
        registry.register(Arc::new(StaticWorker::new(tags::CODE, "Coder", "a")));
        registry.register(Arc::new(StaticWorker::new(tags::TALK, "Jarvis", "b")));
        registry.register_as(tags::CODE, Arc::new(StaticWorker::new(tags::CODE, "Coder v2", "c")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tags()[0], "code");
        assert_eq!(registry.lookup("code").unwrap().display_name(), "Coder v2");
    }

    #[test]
    fn test_sole_worker() {
        let mut registry = WorkerRegistry::new();
        assert!(registry.sole_worker().is_none());
        registry.register(Arc::new(StaticWorker::new(tags::TALK, "Jarvis", "hi")));
        let (tag, worker) = registry.sole_worker().unwrap();
        assert_eq!(tag, "talk");
        assert_eq!(worker.display_name(), "Jarvis");
        registry.register(Arc::new(StaticWorker::new(tags::WEB, "Browser", "hi")));
        assert!(registry.sole_worker().is_none());
    }
}
