//! Shared handle to one blackboard, guarded by a single async mutex.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use super::view::Blackboard;

/// Point-in-time copy of every blackboard entry, sorted by key.
pub type Snapshot = BTreeMap<String, Value>;

/// Concurrency-safe blackboard handle.
///
/// Clones share the same underlying map. Every operation holds the one
/// lock for its whole duration.
#[derive(Debug, Clone, Default)]
pub struct SharedBlackboard {
    inner: Arc<Mutex<Blackboard>>,
}

impl SharedBlackboard {
    /// Create a handle to a fresh, empty blackboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one value.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.set_from("external", key, value).await;
    }

    /// Set one value, recording who wrote it.
    pub async fn set_from(
        &self,
        source: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let key = key.into();
        let mut bb = self.inner.lock().await;
        let replaced = bb.put(key.clone(), value.into()).is_some();
        log::debug!(
            "Set shared context: key={} source={} replaced={}",
            key,
            source,
            replaced
        );
    }

    /// Get a value, or `default` when the key is absent.
    pub async fn get(&self, key: &str, default: Value) -> Value {
        let bb = self.inner.lock().await;
        bb.get_value(key).cloned().unwrap_or(default)
    }

    /// Set several values under one lock acquisition.
    pub async fn update<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let entries: Vec<(String, Value)> = entries.into_iter().collect();
        let count = entries.len();
        let mut bb = self.inner.lock().await;
        bb.extend(entries);
        log::debug!("Updated shared context with {} items", count);
    }

    /// Copy every entry out. Later writes never affect the returned map.
    pub async fn get_all(&self) -> Snapshot {
        self.inner.lock().await.to_map()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Check if the blackboard is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
        log::debug!("Cleared shared context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_default() {
        let bb = SharedBlackboard::new();
        bb.set("task_0_result", "found it").await;

        assert_eq!(bb.get("task_0_result", Value::Null).await, json!("found it"));
        assert_eq!(bb.get("missing", json!("fallback")).await, json!("fallback"));
    }

    #[tokio::test]
    async fn test_update_and_snapshot_is_a_copy() {
        let bb = SharedBlackboard::new();
        bb.update(vec![
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
        ])
        .await;

        let snapshot = bb.get_all().await;
        bb.set("c", 3).await;

        assert_eq!(snapshot.len(), 2);
        assert_eq!(bb.len().await, 3);
        assert!(!snapshot.contains_key("c"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let bb = SharedBlackboard::new();
        let other = bb.clone();
        other.set_from("7", "task_7_success", true).await;

        assert_eq!(bb.get("task_7_success", json!(false)).await, json!(true));

        bb.clear().await;
        assert!(other.is_empty().await);
    }

    #[tokio::test]
    async fn test_rewrites_keep_size_constant() {
        let bb = SharedBlackboard::new();
        for i in 0..500 {
            bb.set_from("0", "task_0_result", format!("answer {}", i)).await;
            bb.set_from("0", "task_0_success", true).await;
        }
        assert_eq!(bb.len().await, 2);
        assert_eq!(bb.get("task_0_result", Value::Null).await, json!("answer 499"));
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        tokio_test::block_on(async {
            let bb = SharedBlackboard::new();
            let writers: Vec<_> = (0..32)
                .map(|i| {
                    let bb = bb.clone();
                    async move { bb.set(format!("k{}", i), i).await }
                })
                .collect();
            futures::future::join_all(writers).await;
            assert_eq!(bb.len().await, 32);
        });
    }
}
