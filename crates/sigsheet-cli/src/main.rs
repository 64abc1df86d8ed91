//! sigsheet CLI - records petition signatures into a spreadsheet
//!
//! Meant to run once an hour from a scheduler. Each run appends the current
//! figures to the hourly sheet and, in the first hour of the day, closes the
//! previous day on the daily sheet.

mod fetcher;
mod store;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fetcher::ChangeOrgFetcher;
use sigsheet::prelude::*;
use sigsheet::{DailySummaryConfig, RollingSummaryConfig};
use std::io;
use std::path::PathBuf;
use store::{GoogleSheetsStore, JsonStore};

#[derive(Parser)]
#[command(name = "sigsheet")]
#[command(
    author,
    version,
    about = "Record petition signatures into Google Sheets time series"
)]
struct Cli {
    /// Name (slug) of the petition to get metrics from
    #[arg(long)]
    petition_name: String,

    /// Id of the spreadsheet to update
    #[arg(long, required_unless_present = "dry_run")]
    spreadsheet_id: Option<String>,

    /// TOML file with anchors, sheets and summaries
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the sheet for the hourly series
    #[arg(long)]
    hourly_sheet_name: Option<String>,

    /// Single-column range receiving the hourly summary (e.g. Chart!F28:F31)
    #[arg(long)]
    hourly_summary_range: Option<String>,

    /// Id of the sheet for the hourly series
    #[arg(long)]
    hourly_sheet_id: Option<i64>,

    /// Id of the chart plotting the hourly series
    #[arg(long)]
    hourly_chart_id: Option<i64>,

    /// Name of the sheet for the daily series
    #[arg(long)]
    daily_sheet_name: Option<String>,

    /// Range receiving the latest daily increases, one row per day
    #[arg(long)]
    daily_summary_range: Option<String>,

    /// Id of the sheet for the daily series
    #[arg(long)]
    daily_sheet_id: Option<i64>,

    /// Id of the chart plotting the daily series
    #[arg(long)]
    daily_chart_id: Option<i64>,

    /// OAuth bearer token for the Sheets API
    #[arg(long, env = "SIGSHEET_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the requests as JSON instead of sending them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Configuration file values, overridden by any flag that was given
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        if let Some(name) = &self.hourly_sheet_name {
            config.hourly.sheet_name = name.clone();
        }
        if let Some(range) = &self.hourly_summary_range {
            config.hourly.summaries = vec![RollingSummaryConfig {
                range: range.clone(),
                offsets: OffsetPolicy::Fixed(vec![48, 24, 12, 6]),
                trend: false,
            }];
        }
        if let Some(id) = self.hourly_sheet_id {
            config.hourly.sheet_id = Some(id);
        }
        if self.hourly_chart_id.is_some() {
            config.hourly.chart_id = self.hourly_chart_id;
        }

        if let Some(name) = &self.daily_sheet_name {
            config.daily.sheet_name = name.clone();
        }
        if let Some(range) = &self.daily_summary_range {
            let (columns, trend) = config
                .daily
                .summary
                .take()
                .map(|s| (s.columns, s.trend))
                .unwrap_or_else(|| (vec!["C".into()], true));
            config.daily.summary = Some(DailySummaryConfig {
                range: range.clone(),
                columns,
                trend,
            });
        }
        if let Some(id) = self.daily_sheet_id {
            config.daily.sheet_id = Some(id);
        }
        if self.daily_chart_id.is_some() {
            config.daily.chart_id = self.daily_chart_id;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;
    let updater = Updater::new(cli.petition_name.clone(), &config, &chrono::Local)
        .context("Invalid configuration")?;

    let client = reqwest::blocking::Client::builder()
        .build()
        .context("Building HTTP client")?;
    let fetcher = ChangeOrgFetcher::new(client.clone());
    let now = chrono::Local::now();

    if cli.dry_run {
        let store = JsonStore::new(io::stdout().lock());
        updater.run_once(&fetcher, &store, &now)?;
        return Ok(());
    }

    let (Some(spreadsheet_id), Some(token)) = (cli.spreadsheet_id, cli.token) else {
        bail!("--spreadsheet-id and --token (or SIGSHEET_TOKEN) are required unless --dry-run is set");
    };
    let store = GoogleSheetsStore::new(client, spreadsheet_id, token);
    updater.run_once(&fetcher, &store, &now)?;
    Ok(())
}
