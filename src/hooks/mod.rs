//! Hooks for observing collaboration runs.
//!
//! The scheduler reports mode entry, task start, retry and completion to a
//! [`HookRegistry`]. By default it holds a single [`LoggingHook`].

pub mod lifecycle;

pub use lifecycle::{ExecutionHook, HookError, HookRegistry, LoggingHook};
