//! Interactive router demo.
//!
//! Reads one request per line from stdin, routes it and prints the outcome.
//! Workers answer with fixed text, so this exercises routing, decomposition
//! and scheduling without any model provider.
//!
//! A line may start with a mode in brackets, e.g.
//! `[parallel] Search for Rust news and then write a summary`.
//!
//! # Environment Variables
//!
//! - `AGENT_ROUTER_CONFIG`: path to a YAML or JSON config file (optional)
//! - `AGENT_ROUTER_MAX_PARALLEL`, `AGENT_ROUTER_TIMEOUT_SECS`,
//!   `AGENT_ROUTER_DEFAULT_MODE`: override single config values
//! - `RUST_LOG`: tracing filter (default: "info,agent_router=debug")

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use agent_router::agents::{SideChannel, StaticWorker};
use agent_router::capabilities::tags;
use agent_router::routing::{FewShotClassifier, IntentClassifier, RouteOutcome, Router};
use agent_router::{CollaborationMode, RouterConfig, WorkerRegistry};

const CONFIG_ENV: &str = "AGENT_ROUTER_CONFIG";

/// Prints worker progress messages to the log.
struct LogChannel;

impl SideChannel for LogChannel {
    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

fn load_config() -> anyhow::Result<RouterConfig> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => RouterConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => RouterConfig::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

fn demo_registry(config: &RouterConfig) -> WorkerRegistry {
    WorkerRegistry::new()
        .with(Arc::new(StaticWorker::new(
            tags::CODE,
            "Coder",
            "Here is a script that does what you asked.",
        )))
        .with(Arc::new(StaticWorker::new(
            tags::WEB,
            "Browser",
            "I found several relevant pages.",
        )))
        .with(Arc::new(StaticWorker::new(
            tags::FILES,
            "File Manager",
            "The files are where you asked.",
        )))
        .with(Arc::new(StaticWorker::new(
            config.talk_capability.clone(),
            "Casual",
            "Happy to chat!",
        )))
        .with(Arc::new(StaticWorker::new(
            config.planner_capability.clone(),
            "Planner",
            "Here is a step-by-step plan.",
        )))
}

/// Split an optional `[mode]` prefix off a request line.
fn parse_line(line: &str, default_mode: CollaborationMode) -> (CollaborationMode, &str) {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('[') {
        if let Some((mode, text)) = rest.split_once(']') {
            if let Ok(mode) = mode.parse() {
                return (mode, text.trim());
            }
        }
    }
    (default_mode, line)
}

fn print_outcome(outcome: &RouteOutcome) {
    match outcome {
        RouteOutcome::Single {
            capability,
            display_name,
            output,
            success,
        } => {
            let status = if *success { "ok" } else { "failed" };
            println!("{} ({}) [{}]: {}", display_name, capability, status, output.answer);
        }
        RouteOutcome::Collaborative(results) => {
            let succeeded = results.iter().filter(|r| r.success).count();
            println!("{}/{} sub-tasks succeeded", succeeded, results.len());
            for result in results {
                println!("  {}", result);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agent_router=debug".into()),
        )
        .init();

    let config = load_config()?;
    let registry = demo_registry(&config);

    let complexity = Arc::new(FewShotClassifier::new());
    let capability = Arc::new(FewShotClassifier::new());
    let intent = IntentClassifier::new(complexity, capability.clone(), capability);
    intent.seed_examples()?;

    let default_mode = config.default_mode;
    let router = Router::new(config, registry, intent);
    tracing::info!("Type a request per line; Ctrl-D to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (mode, text) = parse_line(&line, default_mode);
        if text.is_empty() {
            continue;
        }
        match router.handle_with_mode(text, mode, Some(&LogChannel)).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    router.shutdown();
    Ok(())
}
