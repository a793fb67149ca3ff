//! Sync command - Walk the directory and emit the identity graph

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use grafsync_connector::sync::{SyncDriver, SyncGraph};
use grafsync_connector_grafana::{GrafanaConfig, GrafanaConnector};

use super::ConnectionArgs;
use crate::error::CliResult;

/// Arguments for the sync command
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Write the graph to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print only resource and grant counts
    #[arg(long)]
    pub summary: bool,
}

/// Execute the sync command
pub async fn execute(connection: &ConnectionArgs, args: SyncArgs) -> CliResult<()> {
    let config = connection.load_config()?;
    let graph = run_sync(&config).await?;

    let rendered = if args.summary {
        serde_json::to_string_pretty(&graph.summary())?
    } else {
        serde_json::to_string_pretty(&graph)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            info!(path = %path.display(), "Wrote sync output");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Connect with `config` and run a full sync.
pub async fn run_sync(config: &GrafanaConfig) -> CliResult<SyncGraph> {
    let connector = GrafanaConnector::connect(config).await?;
    let graph = SyncDriver::for_connector(&connector).run().await?;
    Ok(graph)
}
