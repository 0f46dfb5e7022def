//! Dependency ordering for sub-task lists.

use std::collections::{HashMap, HashSet};

use crate::task::SubTask;

/// Outcome of walking a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A cycle passes through this task.
    Cycle(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first topological order: every task appears after all of its
/// dependencies. Ties keep input order.
///
/// Dependencies naming ids outside `tasks` are skipped with a warning.
pub fn topological_order(tasks: &[SubTask]) -> Result<Vec<SubTask>, GraphError> {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| (task.id.as_str(), i))
        .collect();
    let mut marks: HashMap<usize, Mark> = HashMap::with_capacity(tasks.len());
    let mut order = Vec::with_capacity(tasks.len());

    for start in 0..tasks.len() {
        visit(start, tasks, &index, &mut marks, &mut order)?;
    }

    Ok(order.into_iter().map(|i| tasks[i].clone()).collect())
}

fn visit(
    node: usize,
    tasks: &[SubTask],
    index: &HashMap<&str, usize>,
    marks: &mut HashMap<usize, Mark>,
    order: &mut Vec<usize>,
) -> Result<(), GraphError> {
    match marks.get(&node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(GraphError::Cycle(tasks[node].id.clone())),
        None => {}
    }
    marks.insert(node, Mark::Visiting);

    for dep in &tasks[node].dependencies {
        match index.get(dep.as_str()) {
            Some(&dep_node) => visit(dep_node, tasks, index, marks, order)?,
            None => log::warn!(
                "Ignoring unknown dependency task_id={} dependency={}",
                tasks[node].id,
                dep
            ),
        }
    }

    marks.insert(node, Mark::Done);
    order.push(node);
    Ok(())
}

/// Fail on the first task that sits on a dependency cycle.
pub fn ensure_acyclic(tasks: &[SubTask]) -> Result<(), GraphError> {
    topological_order(tasks).map(|_| ())
}

/// Ids that appear more than once.
pub fn duplicate_ids(tasks: &[SubTask]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for task in tasks {
        if !seen.insert(task.id.as_str()) && !dupes.contains(&task.id) {
            dupes.push(task.id.clone());
        }
    }
    dupes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[SubTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let tasks = vec![
            SubTask::new("c", "files", "save").depends_on("b"),
            SubTask::new("a", "web", "search"),
            SubTask::new("b", "code", "write").depends_on("a"),
        ];
        let order = topological_order(&tasks).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_independent_tasks_keep_input_order() {
        let tasks = vec![
            SubTask::new("0", "web", "one"),
            SubTask::new("1", "code", "two"),
            SubTask::new("2", "talk", "three"),
        ];
        assert_eq!(ids(&topological_order(&tasks).unwrap()), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_diamond() {
        let tasks = vec![
            SubTask::new("d", "talk", "d").depends_on("b").depends_on("c"),
            SubTask::new("b", "web", "b").depends_on("a"),
            SubTask::new("c", "code", "c").depends_on("a"),
            SubTask::new("a", "files", "a"),
        ];
        assert_eq!(ids(&topological_order(&tasks).unwrap()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let tasks = vec![
            SubTask::new("a", "web", "a").depends_on("b"),
            SubTask::new("b", "code", "b").depends_on("a"),
        ];
        assert_eq!(topological_order(&tasks), Err(GraphError::Cycle("a".into())));

        let self_loop = vec![SubTask::new("x", "talk", "x").depends_on("x")];
        assert_eq!(ensure_acyclic(&self_loop), Err(GraphError::Cycle("x".into())));
    }

    #[test]
    fn test_unknown_dependency_ignored() {
        let tasks = vec![SubTask::new("a", "web", "a").depends_on("ghost")];
        assert_eq!(ids(&topological_order(&tasks).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_duplicate_ids() {
        let tasks = vec![
            SubTask::new("a", "web", "a"),
            SubTask::new("a", "code", "a"),
            SubTask::new("b", "talk", "b"),
            SubTask::new("a", "files", "a"),
        ];
        assert_eq!(duplicate_ids(&tasks), vec!["a".to_string()]);
    }
}
