use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::{COLUMNS, TIMESTAMP_FORMAT};
use crate::models::CleanRecord;
use crate::traits::Sink;

/// Writes the dataset as UTF-8 delimited text with a header row and no
/// index column.
pub struct CsvSink {
    path: String,
}

impl CsvSink {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Sink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn load(&self, records: &[CleanRecord]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path))?;

        writer.write_record(COLUMNS)?;
        for record in records {
            writer.write_record([
                record.title.clone(),
                record.price_idr.to_string(),
                record.rating.to_string(),
                record.colors.to_string(),
                record.size.clone(),
                record.gender.clone(),
                record.extracted_at.format(TIMESTAMP_FORMAT).to_string(),
            ])?;
        }
        writer.flush()?;

        info!(path = %self.path, rows = records.len(), "Saved dataset to CSV");
        Ok(())
    }
}
