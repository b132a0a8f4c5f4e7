//! Sink adapters for the cleaned dataset.
//!
//! Each sink takes the finalized dataset and a destination descriptor and
//! performs one best-effort write. Sinks are independent of each other:
//! the orchestrator fans out to all of them and logs each result, and a
//! failure in one never blocks or rolls back another.

mod csv_file;
mod postgres;
mod sheets;

pub use csv_file::CsvSink;
pub use postgres::PostgresSink;
pub use sheets::SheetsSink;

/// Output column order, shared by every sink.
pub(crate) const COLUMNS: [&str; 7] = [
    "Title",
    "Price (IDR)",
    "Rating",
    "Colors",
    "Size",
    "Gender",
    "timestamp",
];

/// Timestamp rendering used wherever the dataset is stringified.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
