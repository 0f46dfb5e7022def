//! Task outcomes.

pub mod task_result;

pub use task_result::TaskResult;
