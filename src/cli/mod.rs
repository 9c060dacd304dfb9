//! Command-line interface definition and dispatch for corral.
//!
//! Uses [`clap`] for argument parsing with derive macros. A run takes one
//! prompt, wires the configured provider and the sandboxed tools into an
//! [`AgentLoop`](crate::agent::AgentLoop), and prints the result.

use crate::agent::AgentLoop;
use crate::config;
use crate::message::Conversation;
use crate::output::StdoutRenderer;
use crate::provider::{self, Provider};
use crate::sandbox::WorkingRoot;
use crate::tools::ToolRegistry;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// Top-level CLI structure for corral.
///
/// Parsed from command-line arguments via [`clap::Parser`]. The prompt is
/// required; clap prints usage and exits non-zero when it is missing.
#[derive(Parser, Debug)]
#[command(
    name = "corral",
    version,
    about = "An AI coding agent whose tools stay inside one directory"
)]
pub struct Cli {
    /// The request to send to the model
    pub prompt: String,
    /// Print tool arguments, tool results, and token usage
    #[arg(long)]
    pub verbose: bool,
    /// Directory the tools are confined to (overrides config)
    #[arg(short = 'C', long)]
    pub root: Option<PathBuf>,
    /// Model to use (overrides config); accepts provider/model shorthand
    #[arg(short, long)]
    pub model: Option<String>,
    /// Provider to use (gemini, anthropic, openai, openrouter, ollama)
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Maximum number of model round trips
    #[arg(long)]
    pub max_calls: Option<usize>,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Runs one prompt to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;

    let selection =
        provider::resolve_model(cli.provider.as_deref(), cli.model.as_deref(), &config)?;
    let root = WorkingRoot::new(cli.root.unwrap_or_else(|| config.working_dir()))?;
    let max_calls = cli.max_calls.unwrap_or_else(|| config.max_calls());
    debug!(?selection, %root, max_calls, "starting run");

    if cli.verbose {
        println!(
            "{} [model: {}] [root: {}]",
            crate::constants::APP_NAME.bold().cyan(),
            selection.model.yellow(),
            root,
        );
    }

    let provider = Provider::from_config(&config, &selection)?;
    let tools = ToolRegistry::with_builtins(root, config.tool_settings());

    let mut conversation = Conversation::new(&cli.prompt);
    let mut renderer = StdoutRenderer::new(cli.verbose);
    let system_prompt = config.system_prompt();
    let report = AgentLoop::new(&provider, &tools, &system_prompt, max_calls)
        .run(&mut conversation, &mut renderer)
        .await?;

    if cli.verbose {
        renderer.summary(&cli.prompt, report.round_trips, &report.usage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_required() {
        let err = Cli::try_parse_from(["corral"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_prompt_and_verbose() {
        let cli = Cli::try_parse_from(["corral", "list files in pkg", "--verbose"]).unwrap();
        assert_eq!(cli.prompt, "list files in pkg");
        assert!(cli.verbose);
        assert!(cli.root.is_none());
        assert!(cli.max_calls.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "corral",
            "fix the bug",
            "-C",
            "./calculator",
            "--model",
            "gemini/gemini-2.5-flash",
            "--max-calls",
            "5",
        ])
        .unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("./calculator")));
        assert_eq!(cli.model.as_deref(), Some("gemini/gemini-2.5-flash"));
        assert_eq!(cli.max_calls, Some(5));
    }
}
