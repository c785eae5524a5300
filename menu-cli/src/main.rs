//! Binary crate for the `menu-notifier` scheduled job.
//!
//! This crate focuses on:
//! - Loading `.env` and installing logging
//! - Parsing CLI arguments
//! - Handing a resolved config to `menu-core`

use clap::Parser;
use tracing::error;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cmd = cli::Cli::parse();
    if let Err(e) = cmd.run().await {
        error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
