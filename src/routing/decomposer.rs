//! Splits a multi-step request into sub-tasks.
//!
//! The strategy is lexical and deterministic: cut the text at sentence
//! boundaries, tag each clause with a capability by keyword, and number the
//! clauses in order. Clauses are independent; whether they run in order is
//! decided by the execution mode, not by inferred dependencies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::capabilities::tags;
use crate::scheduler::graph::{self, GraphError};
use crate::task::SubTask;
use crate::utilities::config::SchedulerConfig;
use crate::utilities::errors::DecompositionError;

/// Sentence terminators followed by whitespace or end of text, or CJK
/// terminators and newlines anywhere. A period inside "notes.txt" is kept.
static CLAUSE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+(?:\s+|$)|[。！？\n]+")
        .unwrap_or_else(|e| panic!("invalid clause boundary pattern: {}", e))
});

const CODE_KEYWORDS: &[&str] = &[
    "write", "code", "script", "program", "debug", "create app", "寫", "程式", "代碼", "腳本",
];
const WEB_KEYWORDS: &[&str] = &[
    "search", "browse", "web", "find online", "look up", "搜尋", "查找", "瀏覽", "網頁",
];
const FILE_KEYWORDS: &[&str] = &[
    "file", "folder", "directory", "save", "organize", "檔案", "文件", "資料夾", "保存",
];

/// Capability tag for one clause: code, then web, then files, else talk.
pub fn detect_capability(clause: &str) -> &'static str {
    let lower = clause.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has_any(CODE_KEYWORDS) {
        tags::CODE
    } else if has_any(WEB_KEYWORDS) {
        tags::WEB
    } else if has_any(FILE_KEYWORDS) {
        tags::FILES
    } else {
        tags::TALK
    }
}

/// Non-empty, trimmed clauses of `text` in order.
pub fn split_clauses(text: &str) -> Vec<&str> {
    CLAUSE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Turns collaborative requests into sub-task lists.
#[derive(Debug, Clone, Default)]
pub struct TaskDecomposer {
    defaults: SchedulerConfig,
}

impl TaskDecomposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sub-tasks take their timeout and retry budget from `config`.
    pub fn with_config(config: &SchedulerConfig) -> Self {
        Self {
            defaults: config.clone(),
        }
    }

    /// One sub-task per clause, with ids `"0"`, `"1"`, ... and no
    /// dependencies.
    pub fn decompose(&self, text: &str) -> Result<Vec<SubTask>, DecompositionError> {
        let tasks: Vec<SubTask> = split_clauses(text)
            .into_iter()
            .enumerate()
            .map(|(i, clause)| {
                SubTask::new(i.to_string(), detect_capability(clause), clause)
                    .with_defaults_from(&self.defaults)
            })
            .collect();

        if tasks.is_empty() {
            return Err(DecompositionError::Empty);
        }
        validate(&tasks)?;

        log::debug!(
            "Decomposed request tasks={} capabilities={:?}",
            tasks.len(),
            tasks.iter().map(|t| t.capability.as_str()).collect::<Vec<_>>()
        );
        Ok(tasks)
    }
}

/// Reject sub-task lists whose dependencies form a cycle.
pub fn validate(tasks: &[SubTask]) -> Result<(), DecompositionError> {
    graph::ensure_acyclic(tasks).map_err(|e| match e {
        GraphError::Cycle(task_id) => DecompositionError::CyclicDependency { task_id },
    })
}
