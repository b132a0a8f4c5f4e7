//! Data models for scraped rows and the cleaned dataset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title emitted when a card has no title heading.
pub const PLACEHOLDER_TITLE: &str = "Unknown Product";

/// Price emitted when a card has no price container.
pub const PRICE_SENTINEL: &str = "Price Unavailable";

/// Rating emitted when no rating paragraph is found in a card.
pub const RATING_SENTINEL: &str = "Invalid Rating";

/// Shared sentinel for missing colors, size and gender paragraphs.
pub const NA_SENTINEL: &str = "N/A";

/// The raw string fields of a single product card.
///
/// Every field is always populated: missing data is represented by the
/// sentinel literal for that field, never by an absent value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFieldSet {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub colors: String,
    pub size: String,
    pub gender: String,
}

impl RawFieldSet {
    /// Attach the run-wide extraction timestamp to produce a full record.
    pub fn into_record(self, extracted_at: DateTime<Utc>) -> RawRecord {
        RawRecord {
            title: self.title,
            price: self.price,
            rating: self.rating,
            colors: self.colors,
            size: self.size,
            gender: self.gender,
            extracted_at,
        }
    }
}

/// One scraped product card, before any cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub colors: String,
    pub size: String,
    pub gender: String,
    pub extracted_at: DateTime<Utc>,
}

/// One validated, normalized product row.
///
/// After the transform pipeline completes: `title` is never the placeholder,
/// `rating` is in `[0, 5]` with one decimal place, `colors` is at least 1,
/// and no two rows are fully identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub title: String,
    /// Price converted into IDR: `round(price_usd * exchange_rate)`.
    pub price_idr: i64,
    pub rating: f64,
    pub colors: i64,
    pub size: String,
    pub gender: String,
    pub extracted_at: DateTime<Utc>,
}
