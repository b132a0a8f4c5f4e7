use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::extractor;
use crate::fetcher::HttpFetcher;
use crate::sinks::{CsvSink, PostgresSink, SheetsSink};
use crate::traits::Sink;
use crate::transform;

/// Orchestrates one full extract -> transform -> load run.
///
/// An empty dataset out of extract or transform ends the run before any
/// load is attempted; individual sink failures are logged and never fail
/// the run.
pub struct EtlPipeline {
    config: Config,
    fetcher: HttpFetcher,
}

impl EtlPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new()?;
        Ok(Self { config, fetcher })
    }

    pub async fn run(&self) -> Result<()> {
        info!("[1/3] Extract");
        let raw = extractor::extract(
            &self.fetcher,
            &self.config.base_url,
            self.config.total_pages,
            Utc::now(),
        )
        .await;
        if raw.is_empty() {
            warn!("Extraction produced no data, stopping the run");
            return Ok(());
        }

        info!("[2/3] Transform");
        let clean = transform::transform(&raw, self.config.exchange_rate);
        if clean.is_empty() {
            warn!("Transform produced no data, stopping the run");
            return Ok(());
        }
        for row in clean.iter().take(5) {
            info!(
                title = %row.title,
                price_idr = row.price_idr,
                rating = row.rating,
                colors = row.colors,
                "Sample clean row"
            );
        }

        info!("[3/3] Load");
        let sinks: Vec<Box<dyn Sink>> = vec![
            Box::new(CsvSink::new(self.config.csv_file_path.clone())),
            Box::new(SheetsSink::new(
                self.config.gsheet_id.clone(),
                self.config.service_account_file.clone(),
            )),
            Box::new(PostgresSink::new(
                self.config.db_url.clone(),
                self.config.db_table_name.clone(),
            )),
        ];
        for sink in &sinks {
            match sink.load(&clean).await {
                Ok(()) => info!(sink = sink.name(), "Load succeeded"),
                Err(e) => error!(sink = sink.name(), error = %e, "Load failed"),
            }
        }

        info!("ETL pipeline finished");
        Ok(())
    }
}
