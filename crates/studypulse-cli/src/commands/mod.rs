pub mod class;
pub mod student;
pub mod topic;
pub mod validate;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use studypulse_core::model::ContentStatus;
use studypulse_core::ProgressService;
use studypulse_stores::{load_config_from, Dataset, MemoryStore};

/// Flags shared by the snapshot commands.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Path to the JSON dataset (overrides the config file)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: json, table
    #[arg(long, default_value = "json")]
    pub format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            other => anyhow::bail!("unknown format '{other}' (expected json or table)"),
        }
    }
}

impl DataArgs {
    /// Resolve the output format, config and dataset, and build a service
    /// over the loaded data.
    pub fn open(&self) -> Result<(ProgressService, OutputFormat)> {
        let format: OutputFormat = self.format.parse()?;
        let config = load_config_from(self.config.as_deref())?;
        let path = self.dataset.clone().unwrap_or(config.dataset);
        tracing::debug!(dataset = %path.display(), "opening dataset");
        let dataset = Dataset::load_json(&path)?;
        let stores = MemoryStore::new(dataset).into_stores();
        Ok((ProgressService::new(stores, config.aggregator), format))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn optional_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| "-".to_string())
}

pub fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn status_label(status: ContentStatus) -> &'static str {
    match status {
        ContentStatus::Completed => "completed",
        ContentStatus::InProgress => "in progress",
        ContentStatus::NotStarted => "not started",
    }
}
