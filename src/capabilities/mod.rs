//! # Capabilities
//!
//! A capability tag names a category of work a worker can perform. The
//! router classifies requests into one of these tags and the
//! [`WorkerRegistry`] resolves the tag to the worker that handles it.
//!
//! Tags are plain strings so that deployments can register workers under
//! their own vocabulary; the constants in [`tags`] are the built-in set the
//! decomposer and the default configuration use.

pub mod registry;

pub use registry::WorkerRegistry;

/// Built-in capability tags.
pub mod tags {
    /// Writing, running and debugging code.
    pub const CODE: &str = "code";
    /// Web search and browsing.
    pub const WEB: &str = "web";
    /// Local filesystem work.
    pub const FILES: &str = "files";
    /// Conversation; the fallback for anything unrecognised.
    pub const TALK: &str = "talk";
    /// Multi-step planning for complex requests.
    pub const PLANNER: &str = "planner";
    /// Tool access through an MCP server.
    pub const MCP: &str = "mcp";

    /// Every built-in tag.
    pub const ALL: &[&str] = &[CODE, WEB, FILES, TALK, PLANNER, MCP];
}
