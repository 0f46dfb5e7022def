//! Shared key/value state for cooperating sub-tasks.
//!
//! Completed sub-tasks publish their answers here (`task_<id>_result`,
//! `task_<id>_success`) and later sub-tasks read them back into their
//! prompts. The blackboard imposes no schema on keys or values.
//!
//! # Layers
//!
//! - [`Blackboard`] is the plain map, accessed through `&mut self`.
//! - [`SharedBlackboard`] wraps one `Blackboard` behind a single async
//!   mutex. Every operation takes the lock for its whole duration, so there
//!   are no lost updates or torn reads; contention is bounded by the
//!   scheduler's parallelism.
//!
//! # Ordering
//!
//! Readers see exactly the writes that completed before their read. In
//! sequential and pipeline runs a task's result is written before the next
//! task snapshots the board; parallel siblings share one snapshot taken at
//! batch start and never see each other's writes.

pub mod shared;
pub mod view;

pub use shared::{SharedBlackboard, Snapshot};
pub use view::Blackboard;
