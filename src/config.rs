//! Environment-driven configuration

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

const DEFAULT_BASE_URL: &str = "https://fashion-studio.dicoding.dev";
const DEFAULT_TOTAL_PAGES: u32 = 50;
const DEFAULT_EXCHANGE_RATE: f64 = 16000.0;

/// Runtime settings for one pipeline run.
///
/// The five load destinations are required; the scrape parameters fall back
/// to the catalog's defaults when unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub total_pages: u32,
    /// USD to IDR multiplier applied during price conversion.
    pub exchange_rate: f64,
    pub csv_file_path: String,
    pub gsheet_id: String,
    pub service_account_file: String,
    pub db_url: String,
    pub db_table_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            total_pages: parsed_var("TOTAL_PAGES", DEFAULT_TOTAL_PAGES)?,
            exchange_rate: parsed_var("EXCHANGE_RATE", DEFAULT_EXCHANGE_RATE)?,
            csv_file_path: required_var("CSV_FILE_PATH")?,
            gsheet_id: required_var("GSHEET_ID")?,
            service_account_file: required_var("SERVICE_ACCOUNT_FILE")?,
            db_url: required_var("DB_URL")?,
            db_table_name: required_var("DB_TABLE_NAME")?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("environment variable {name} is not set"))
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow!("invalid value for {name}: {value:?}")),
        Err(_) => Ok(default),
    }
}
