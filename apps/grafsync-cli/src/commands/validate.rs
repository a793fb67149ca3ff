//! Validate command - Check credentials against Grafana

use clap::Args;
use serde::Serialize;

use grafsync_connector::traits::Connector;
use grafsync_connector_grafana::GrafanaConnector;

use super::ConnectionArgs;
use crate::error::CliResult;

/// Arguments for the validate command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ValidateOutput {
    connector: String,
    base_url: String,
    valid: bool,
}

/// Execute the validate command
pub async fn execute(connection: &ConnectionArgs, args: ValidateArgs) -> CliResult<()> {
    let config = connection.load_config()?;
    let connector = GrafanaConnector::connect(&config).await?;
    connector.validate().await?;

    if args.json {
        let output = ValidateOutput {
            connector: connector.metadata().display_name,
            base_url: config.base_url,
            valid: true,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Credentials valid for {}", config.base_url);
    }

    Ok(())
}
