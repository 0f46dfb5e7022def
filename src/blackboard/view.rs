//! The plain key/value map behind the shared blackboard handle.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// Keyed values. Writing a key again replaces its value, so the map only
/// grows with the number of distinct keys.
///
/// # Example
///
/// ```
/// use agent_router::blackboard::Blackboard;
///
/// let mut bb = Blackboard::new();
/// bb.put("task_0_result", serde_json::json!("found 3 tutorials"));
/// bb.put("task_0_success", serde_json::json!(true));
///
/// assert_eq!(bb.get_value("task_0_success"), Some(&serde_json::json!(true)));
/// assert_eq!(bb.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    slots: HashMap<String, Value>,
}

impl Blackboard {
    /// Create an empty blackboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a value into a named slot, returning the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.slots.insert(key.into(), value)
    }

    /// Put several values at once.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.slots.extend(entries);
    }

    /// Get the value stored under a key.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.slots.get(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Copy every key/value pair out, sorted by key.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.slots
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blackboard_new() {
        let bb = Blackboard::new();
        assert!(bb.is_empty());
        assert_eq!(bb.len(), 0);
    }

    #[test]
    fn test_blackboard_put_get() {
        let mut bb = Blackboard::new();
        assert!(bb.put("task_0_result", json!({"msg": "hello"})).is_none());

        assert_eq!(bb.len(), 1);
        assert_eq!(bb.get_value("task_0_result").unwrap()["msg"], "hello");
    }

    #[test]
    fn test_blackboard_overwrite_does_not_grow() {
        let mut bb = Blackboard::new();
        for i in 0..1000 {
            bb.put("k", json!(i));
        }

        assert_eq!(bb.len(), 1);
        assert_eq!(bb.get_value("k"), Some(&json!(999)));
        assert_eq!(bb.put("k", json!("last")), Some(json!(999)));
    }

    #[test]
    fn test_blackboard_to_map_sorted() {
        let mut bb = Blackboard::new();
        bb.extend(vec![("b".to_string(), json!(2)), ("a".to_string(), json!(1))]);
        let map = bb.to_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_blackboard_clear() {
        let mut bb = Blackboard::new();
        bb.put("a", json!(1));
        bb.put("b", json!(2));

        bb.clear();
        assert!(bb.is_empty());
        assert!(bb.get_value("a").is_none());
    }
}
