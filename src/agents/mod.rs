//! Workers: the capability providers the router and scheduler dispatch to.
//!
//! The core never owns a worker's internals (LLM calls, browser sessions,
//! shell tools). It only sees the [`Worker`] contract: an async `process`
//! call plus the outcome of the most recent invocation.

pub mod static_worker;
pub mod worker;

pub use static_worker::StaticWorker;
pub use worker::{SideChannel, Worker, WorkerError, WorkerOutput};
