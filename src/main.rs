use anyhow::Result;
use clap::{Parser, Subcommand};
use privat_rates::core::batch::MAX_DAYS;
use privat_rates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Number of days to fetch, counting back from today (prompted when omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAYS)))]
    days: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => privat_rates::cli::setup::setup(),
        None => {
            privat_rates::run_command(
                privat_rates::AppCommand::Rates { days: cli.days },
                cli.config_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
