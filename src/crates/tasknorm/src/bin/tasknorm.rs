//! tasknorm CLI - normalize messy task lines with an LLM
//!
//! Main entry point for the tasknorm command-line tool.

use anyhow::Context;
use clap::{Parser, Subcommand};
use llm::remote::GroqClient;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tasknorm::cli::{handle_process, OutputFormat};
use tasknorm::prompts::{self, Extraction};
use tasknorm::{AppConfig, BatchRunner, TaskInput, TaskProcessor};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasknorm")]
#[command(about = "Turn messy task lines into structured, prioritized tasks", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process task lines from a file or stdin
    Process {
        /// File with one task per line (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write results to this file (JSON, or CSV with --format csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of tasks processed at once
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Provider base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Retries for transient provider failures
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Print the three rendered prompts for a task (no network)
    Prompts {
        /// Raw task text
        text: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process {
            file,
            format,
            output,
            concurrency,
            model,
            base_url,
            timeout_secs,
            max_retries,
        } => {
            let mut config = AppConfig::from_env()?;
            if let Some(model) = model {
                config = config.with_model(model);
            }
            if let Some(base_url) = base_url {
                config = config.with_base_url(base_url);
            }
            if let Some(secs) = timeout_secs {
                config = config.with_timeout(Duration::from_secs(secs));
            }
            if let Some(retries) = max_retries {
                config = config.with_max_retries(retries);
            }
            if let Some(concurrency) = concurrency {
                config = config.with_concurrency(concurrency);
            }
            config.validate()?;
            tracing::debug!(?config, "Configuration loaded");

            let text = read_input(file.as_deref())?;

            let client = GroqClient::new(config.completion_config())?;
            let runner = BatchRunner::new(TaskProcessor::new(Arc::new(client)))
                .with_concurrency(config.concurrency);

            let report = handle_process(&runner, &text, format, output.as_deref()).await?;
            if report.all_failed() {
                anyhow::bail!("all {} task(s) failed to process", report.items.len());
            }
            Ok(())
        }
        Commands::Prompts { text } => {
            let input = TaskInput::new(text)?;
            for kind in Extraction::ALL {
                println!("=== {} ===", kind);
                println!("{}", prompts::render(kind, input.raw_text()));
                println!();
            }
            Ok(())
        }
        Commands::Version => {
            println!("{}", tasknorm::version::full_version());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: Option<&std::path::Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
