//! Router and scheduler configuration.
//!
//! Configuration is plain serde data with per-field defaults, so a config
//! file only needs to name the values it changes:
//!
//! ```yaml
//! planner_capability: planner
//! default_mode: pipeline
//! scheduler:
//!   max_parallel_tasks: 2
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capabilities::tags;
use crate::process::CollaborationMode;
use crate::utilities::errors::ConfigError;

/// Environment variable overriding `scheduler.max_parallel_tasks`.
pub const ENV_MAX_PARALLEL: &str = "AGENT_ROUTER_MAX_PARALLEL";
/// Environment variable overriding `scheduler.default_timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "AGENT_ROUTER_TIMEOUT_SECS";
/// Environment variable overriding `default_mode`.
pub const ENV_DEFAULT_MODE: &str = "AGENT_ROUTER_DEFAULT_MODE";

/// How long blackboard entries live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackboardScope {
    /// One blackboard for the scheduler's lifetime; context accumulates across runs.
    #[default]
    Scheduler,
    /// The blackboard is cleared at the start of every run.
    Run,
}

/// Configuration for the collaboration scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of worker invocations running at once.
    #[serde(default = "default_max_parallel")]
    pub max_parallel_tasks: usize,
    /// Timeout applied to sub-tasks that don't set their own.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    /// Retry budget applied to sub-tasks that don't set their own.
    #[serde(default = "default_max_retries")]
    pub default_max_retries: u32,
    /// Longest string value copied verbatim from the blackboard into a prompt.
    #[serde(default = "default_preview_chars")]
    pub context_preview_chars: usize,
    #[serde(default)]
    pub blackboard_scope: BlackboardScope,
}

fn default_max_parallel() -> usize { 3 }
fn default_timeout_secs() -> u64 { 300 }
fn default_max_retries() -> u32 { 2 }
fn default_preview_chars() -> usize { 200 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: default_max_parallel(),
            default_timeout_secs: default_timeout_secs(),
            default_max_retries: default_max_retries(),
            context_preview_chars: default_preview_chars(),
            blackboard_scope: BlackboardScope::default(),
        }
    }
}

impl SchedulerConfig {
    /// Default per-task timeout as a `Duration`.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel_tasks == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.max_parallel_tasks must be at least 1".into(),
            ));
        }
        if self.default_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.default_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Languages the language utility is expected to handle.
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<String>,
    /// Capability of the worker that receives HIGH-complexity requests.
    #[serde(default = "default_planner")]
    pub planner_capability: String,
    /// Capability chosen for very short texts without classification.
    #[serde(default = "default_talk")]
    pub talk_capability: String,
    /// Texts at most this many characters long skip capability classification.
    #[serde(default = "default_short_text")]
    pub short_text_threshold: usize,
    /// Complexity predictions below this confidence are treated as HIGH.
    #[serde(default = "default_confidence_threshold")]
    pub complexity_confidence_threshold: f64,
    /// Mode used when a collaborative request doesn't ask for one.
    #[serde(default)]
    pub default_mode: CollaborationMode,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string(), "zh".to_string()]
}
fn default_planner() -> String { tags::PLANNER.to_string() }
fn default_talk() -> String { tags::TALK.to_string() }
fn default_short_text() -> usize { 8 }
fn default_confidence_threshold() -> f64 { 0.5 }

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            supported_languages: default_languages(),
            planner_capability: default_planner(),
            talk_capability: default_talk(),
            short_text_threshold: default_short_text(),
            complexity_confidence_threshold: default_confidence_threshold(),
            default_mode: CollaborationMode::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(ConfigError::Invalid(format!(
                "unsupported config file extension: {}",
                path.display()
            ))),
        }
    }

    /// Apply `AGENT_ROUTER_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_PARALLEL) {
            self.scheduler.max_parallel_tasks = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a number: {}", ENV_MAX_PARALLEL, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.scheduler.default_timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a number: {}", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_MODE) {
            self.default_mode = raw.parse().map_err(ConfigError::Invalid)?;
        }
        self.validate()
    }

    /// Reject values the router cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.complexity_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "complexity_confidence_threshold must be within [0, 1], got {}",
                self.complexity_confidence_threshold
            )));
        }
        if self.planner_capability.trim().is_empty() {
            return Err(ConfigError::Invalid("planner_capability must not be empty".into()));
        }
        self.scheduler.validate()
    }
}
