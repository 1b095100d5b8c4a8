mod analyze;
mod models;
mod setup;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "promptscope",
    version,
    about = "Trace which system prompt segments and user statements shaped each agent response"
)]
struct Cli {
    /// Log request dispatch details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a system prompt against a conversation log.
    Analyze(analyze::AnalyzeArgs),
    /// List the selectable providers and models.
    Models,
    /// Store API keys in ~/.promptscope/credentials.json.
    Setup,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "promptscope_core=debug,info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => analyze::run(args).await,
        Command::Models => {
            models::run();
            Ok(ExitCode::SUCCESS)
        }
        Command::Setup => {
            setup::run_setup()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
