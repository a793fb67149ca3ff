//! grafsync - sync a Grafana directory into an identity graph
//!
//! This CLI enables operators to:
//! - Check that Grafana credentials can read the directory
//! - Run a full sync and write the resulting graph as JSON

use clap::{ArgAction, Parser, Subcommand};

use grafsync_cli::commands::{self, ConnectionArgs};
use grafsync_cli::error::CliResult;
use grafsync_cli::logging;

/// grafsync - Grafana identity sync
#[derive(Parser)]
#[command(name = "grafsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Increase log verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured credentials can list organizations
    Validate(commands::validate::ValidateArgs),

    /// Sync organizations, users and role grants
    Sync(commands::sync::SyncArgs),
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Validate(args) => commands::validate::execute(&cli.connection, args).await,
        Commands::Sync(args) => commands::sync::execute(&cli.connection, args).await,
    }
}
