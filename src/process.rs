//! Execution modes for a collaborative run.
//!
//! A mode decides how the scheduler walks a list of sub-tasks; the
//! sub-tasks themselves carry no execution policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the different ways a decomposed request can be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaborationMode {
    /// Tasks are executed one after another in list order.
    Sequential,
    /// Tasks run concurrently behind a bounded gate, sharing one snapshot.
    Parallel,
    /// Tasks are ordered by their dependencies, then run sequentially.
    Pipeline,
    /// The same task is raced across several workers; the best result wins.
    Competitive,
}

impl fmt::Display for CollaborationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaborationMode::Sequential => write!(f, "sequential"),
            CollaborationMode::Parallel => write!(f, "parallel"),
            CollaborationMode::Pipeline => write!(f, "pipeline"),
            CollaborationMode::Competitive => write!(f, "competitive"),
        }
    }
}

impl Default for CollaborationMode {
    fn default() -> Self {
        CollaborationMode::Sequential
    }
}

impl FromStr for CollaborationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(CollaborationMode::Sequential),
            "parallel" => Ok(CollaborationMode::Parallel),
            "pipeline" => Ok(CollaborationMode::Pipeline),
            "competitive" => Ok(CollaborationMode::Competitive),
            other => Err(format!("unknown collaboration mode: {}", other)),
        }
    }
}
