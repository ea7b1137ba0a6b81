//! Optiscope command-line entry point
//!
//! Reads one snippet from a file or stdin and prints the JSON payload of the
//! chosen command. Rejected snippets still print their error payload but
//! exit with status 2.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use optiscope_core::{AnalysisResult, Analyzer, Language, RecordOutcome};
use optiscope_transform::{OptimizationEngine, OptimizeOutcome, OptimizerConfig};
use optiscope_utils::{init_logging, LogLevel, LoggerConfig};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

const REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "optiscope")]
#[command(about = "Complexity and quality analysis with complexity-driven rewrites")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate complexity, scores and suggestions for a snippet
    Analyze(SnippetArgs),

    /// Search for a rewrite with a strictly cheaper complexity class
    Optimize {
        #[command(flatten)]
        snippet: SnippetArgs,

        /// Configuration file (.toml, .json, .yaml)
        #[arg(short = 'c', long, env = "OPTISCOPE_CONFIG")]
        config: Option<PathBuf>,

        /// Skip the generative rewrite service
        #[arg(long)]
        no_llm: bool,
    },

    /// Analyze and emit a persistable record with heuristic predictions
    Record(SnippetArgs),
}

#[derive(Args)]
struct SnippetArgs {
    /// Source file; stdin when omitted
    file: Option<PathBuf>,

    /// Snippet language (python, c, cpp, java, javascript, go); detected when omitted
    #[arg(short = 'l', long, value_parser = parse_language)]
    language: Option<Language>,

    /// Write the JSON payload to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl SnippetArgs {
    fn read_code(&self) -> Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                let mut code = String::new();
                std::io::stdin()
                    .read_to_string(&mut code)
                    .context("Failed to read snippet from stdin")?;
                Ok(code)
            }
        }
    }

    fn language(&self) -> Option<&'static str> {
        self.language.map(|language| language.as_str())
    }
}

fn parse_language(value: &str) -> std::result::Result<Language, String> {
    value.parse::<Language>().map_err(|e| e.to_string())
}

fn emit<T: Serialize>(payload: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote payload to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn exit_status(accepted: bool) -> ExitCode {
    if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REJECTED)
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Analyze(snippet) => {
            let code = snippet.read_code()?;
            let result = Analyzer::new()
                .analyze(&code, snippet.language())
                .context("Analysis failed")?;
            emit(&result, snippet.output.as_deref())?;
            Ok(exit_status(matches!(result, AnalysisResult::Success(_))))
        }
        Commands::Optimize {
            snippet,
            config,
            no_llm,
        } => {
            let code = snippet.read_code()?;
            let overrides = no_llm.then(|| serde_json::json!({"generative": {"enabled": false}}));
            let config = OptimizerConfig::load(config.as_deref(), overrides)
                .context("Failed to load configuration")?;
            let engine = OptimizationEngine::new(&config);
            let outcome = engine
                .optimize(&code, snippet.language())
                .context("Optimization failed")?;
            emit(&outcome, snippet.output.as_deref())?;
            Ok(exit_status(matches!(outcome, OptimizeOutcome::Optimized(_))))
        }
        Commands::Record(snippet) => {
            let code = snippet.read_code()?;
            let outcome = Analyzer::new()
                .record(&code, snippet.language())
                .context("Analysis failed")?;
            emit(&outcome, snippet.output.as_deref())?;
            Ok(exit_status(matches!(outcome, RecordOutcome::Recorded(_))))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = LoggerConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LoggerConfig::default()
    };
    if let Err(e) = init_logging(&logger) {
        eprintln!("Warning: {e}");
    }

    match run(cli) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
