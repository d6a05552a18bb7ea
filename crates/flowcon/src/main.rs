// SPDX-FileCopyrightText: 2026 FlowCon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FlowCon - captures reusable project knowledge from assistant runs.
//!
//! This is the binary entry point invoked by the host workflow.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod capture;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowcon_config::FlowconConfig;
use flowcon_core::CaptureContext;
use tracing::warn;

/// FlowCon - captures reusable project knowledge from assistant runs.
#[derive(Parser, Debug)]
#[command(name = "flowcon", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract memories from a finished run and send them to FlowCon.
    Capture {
        /// Path to the run transcript (JSON array or JSON Lines).
        #[arg(long)]
        transcript: PathBuf,
        /// Pull request number the run worked on.
        #[arg(long)]
        pr_number: String,
        /// Owner of the repository.
        #[arg(long)]
        repo_owner: String,
        /// Name of the repository.
        #[arg(long)]
        repo_name: String,
    },
    /// Print the memory prompt appended to the assistant's system prompt.
    Prompt,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => flowcon_config::load_and_validate_path(path),
        None => flowcon_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) if matches!(cli.command, Commands::Capture { .. }) => {
            init_tracing(&FlowconConfig::default().log_level);
            warn!(
                "invalid FlowCon configuration, memory capture disabled\n{}",
                flowcon_config::render_report(&errors)
            );
            return;
        }
        Err(errors) => {
            flowcon_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    match cli.command {
        Commands::Capture {
            transcript,
            pr_number,
            repo_owner,
            repo_name,
        } => {
            let context = CaptureContext::new(pr_number, repo_owner, repo_name);
            capture::run_capture(&transcript, &context, &config).await;
        }
        Commands::Prompt => {
            let prompt = flowcon_memory::memory_prompt(config.capture.memory_prompt.as_deref());
            println!("{prompt}");
        }
    }
}

/// Initialize the tracing subscriber. Output goes to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flowcon={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_capture_arguments() {
        let cli = Cli::try_parse_from([
            "flowcon",
            "capture",
            "--transcript",
            "/tmp/run.json",
            "--pr-number",
            "7",
            "--repo-owner",
            "acme",
            "--repo-name",
            "widgets",
        ])
        .unwrap();
        match cli.command {
            Commands::Capture {
                transcript,
                pr_number,
                repo_owner,
                repo_name,
            } => {
                assert_eq!(transcript, PathBuf::from("/tmp/run.json"));
                assert_eq!(pr_number, "7");
                assert_eq!(repo_owner, "acme");
                assert_eq!(repo_name, "widgets");
            }
            other => panic!("expected capture, got {other:?}"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn capture_requires_pr_context() {
        let result = Cli::try_parse_from(["flowcon", "capture", "--transcript", "run.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["flowcon", "prompt", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Prompt));
    }
}
