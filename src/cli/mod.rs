use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Bitcoin forward transaction tracer and suspicious pattern detector
#[derive(Parser)]
#[command(name = "chain-trace")]
#[command(about = "Bitcoin forward transaction tracer and suspicious pattern detector")]
#[command(version)]
pub struct Cli {
    /// Log at info level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Trace where the funds of a transaction went next
    Trace(commands::trace::TraceCommand),
    /// Score an address's recent transactions for suspicious patterns
    Detect(commands::detect::DetectCommand),
    /// Test ledger provider connectivity
    TestProvider(commands::test_provider::TestProviderCommand),
}

pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Uses RUST_LOG environment variable (defaults to "error", or "info" with --verbose)
    let default_level = if cli.verbose { "info" } else { "error" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    match cli.command {
        Commands::Trace(command) => command.run().await,
        Commands::Detect(command) => command.run().await,
        Commands::TestProvider(command) => command.run().await,
    }
}
