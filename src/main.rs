use anyhow::Result;
use tracing::{error, info};

mod config;
mod extractor;
mod fetcher;
mod models;
mod pipeline;
mod sinks;
mod traits;
mod transform;

use config::Config;
use pipeline::EtlPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting fashion catalog ETL");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Missing or invalid configuration, stopping");
            return Ok(());
        }
    };

    let etl = EtlPipeline::new(config)?;
    etl.run().await
}
