//! Traits at the fetch and load seams of the pipeline

use anyhow::Result;
use async_trait::async_trait;

use crate::fetcher::FetchOutcome;
use crate::models::CleanRecord;

/// Trait for fetching one catalog page at a time.
///
/// The production implementation performs a real HTTP GET; the extraction
/// loop only sees classified outcomes, so tests can drive it with scripted
/// fetchers instead of a live site.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single catalog page and classify the result.
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the page to fetch
    ///
    /// # Returns
    /// * `FetchOutcome` - never an error; every failure mode is classified
    ///   into one of the outcome variants
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Trait for a destination that stores the finalized dataset.
///
/// Sinks are stateless and independent: each performs a single best-effort
/// write of the whole dataset. The orchestrator logs each sink's result and
/// never lets one sink's failure affect another.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Short sink name used in log entries.
    fn name(&self) -> &'static str;

    /// Write the whole dataset in one pass.
    ///
    /// # Arguments
    /// * `records` - The finalized, cleaned dataset
    ///
    /// # Returns
    /// * `Result<()>` - success, or the failure for the caller to log
    async fn load(&self, records: &[CleanRecord]) -> Result<()>;
}
