//! Google Sheets sink.
//!
//! Uploads the dataset to a spreadsheet through the Sheets v4 values API:
//! the target sheet is cleared, then the header row and all data rows are
//! written as raw values starting at `Sheet1!A1`. Authorization comes from
//! a credential file on disk holding a bearer token; if that file is
//! missing the sink fails before any network call is made.

use std::path::Path;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{COLUMNS, TIMESTAMP_FORMAT};
use crate::models::CleanRecord;
use crate::traits::Sink;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TARGET_RANGE: &str = "Sheet1";
const ORIGIN_CELL: &str = "Sheet1!A1";

#[derive(Deserialize)]
struct SheetsCredentials {
    token: String,
}

pub struct SheetsSink {
    client: Client,
    spreadsheet_id: String,
    credentials_path: String,
}

impl SheetsSink {
    pub fn new(spreadsheet_id: String, credentials_path: String) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id,
            credentials_path,
        }
    }
}

fn read_token(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        bail!("credentials file not found: {path}");
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials file {path}"))?;
    let credentials: SheetsCredentials =
        serde_json::from_str(&raw).context("invalid credentials file")?;
    Ok(credentials.token)
}

#[async_trait]
impl Sink for SheetsSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn load(&self, records: &[CleanRecord]) -> Result<()> {
        // No network traffic without a credential file.
        let token = read_token(&self.credentials_path)?;

        let mut values = vec![COLUMNS.iter().map(|column| json!(column)).collect::<Vec<_>>()];
        for record in records {
            values.push(vec![
                json!(record.title),
                json!(record.price_idr),
                json!(record.rating),
                json!(record.colors),
                json!(record.size),
                json!(record.gender),
                json!(record.extracted_at.format(TIMESTAMP_FORMAT).to_string()),
            ]);
        }

        let clear_url = format!(
            "{SHEETS_API}/{}/values/{TARGET_RANGE}:clear",
            self.spreadsheet_id
        );
        let response = self
            .client
            .post(&clear_url)
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("failed to clear sheet: HTTP {}", response.status());
        }

        let update_url = format!(
            "{SHEETS_API}/{}/values/{ORIGIN_CELL}?valueInputOption=RAW",
            self.spreadsheet_id
        );
        let response = self
            .client
            .put(&update_url)
            .bearer_auth(&token)
            .json(&json!({ "values": values }))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("failed to update sheet: HTTP {}", response.status());
        }

        info!(
            spreadsheet_id = %self.spreadsheet_id,
            rows = records.len(),
            "Uploaded dataset to Google Sheets"
        );
        Ok(())
    }
}
