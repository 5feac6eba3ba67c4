//! CLI application for Indonesian e-Faktur validation.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{compare, config, extract, validate};

/// e-Faktur validator - check tax invoices against the DJP record
#[derive(Parser)]
#[command(name = "efaktur")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an e-Faktur against its reference record
    Validate(validate::ValidateArgs),

    /// Extract fields from an e-Faktur without validating
    Extract(extract::ExtractArgs),

    /// Compare a saved extraction with a saved reference response
    Compare(compare::CompareArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Validate(args) => validate::run(args, cli.config.as_deref()).await,
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Compare(args) => compare::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
