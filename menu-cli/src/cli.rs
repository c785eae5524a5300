use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use menu_core::{
    Config, ConfigFile, FoodAndCoClient, MenuSource, Today, WebhookNotifier, card, pipeline,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "menu-notifier", version, about = "Post today's canteen menu to chat")]
pub struct Cli {
    /// Path to the config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch today's menus and post them to every location's channel.
    Run {
        /// Pretend today is this date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Post a single relabelled location to TEST_CHANNEL_ID.
        #[arg(long)]
        test: bool,
    },

    /// Print the payload that would be posted for a location, without posting it.
    Preview {
        /// Location name, as configured.
        location: String,

        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List configured locations.
    Locations,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => ConfigFile::default_path()?,
        };

        match self.command {
            Command::Run { date, test } => {
                let config = load(&path, test)?;
                let today = resolve_today(&config, date);

                let source = Arc::new(FoodAndCoClient::from_config(&config));
                let notifier = Arc::new(WebhookNotifier::from_config(&config));

                pipeline::run(today, &config.locations, source, notifier).await;
            }
            Command::Preview { location, date } => {
                let config = load(&path, false)?;
                let today = resolve_today(&config, date);

                let location = config
                    .location(&location)
                    .ok_or_else(|| anyhow!("Unknown location '{location}'"))?;

                let menu = FoodAndCoClient::from_config(&config).fetch(location, &today).await?;
                let payload = card::render_payload(location, &menu, &config.menu_site_url, false);

                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Command::Locations => {
                let config = load(&path, false)?;
                for l in &config.locations {
                    println!("{}\trestaurant={}\tmenu={}", l.name, l.restaurant_id, l.other_id);
                }
            }
        }

        Ok(())
    }
}

fn load(path: &std::path::Path, testing: bool) -> anyhow::Result<Config> {
    Config::load(path, testing).context("Invalid configuration")
}

fn resolve_today(config: &Config, date: Option<NaiveDate>) -> Today {
    match date {
        Some(d) => Today::from_date(d),
        None => Today::now_in(config.timezone),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
