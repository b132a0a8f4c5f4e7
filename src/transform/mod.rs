//! Data cleaning: per-field normalization, row filtering and deduplication

use std::collections::HashSet;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::models::{CleanRecord, NA_SENTINEL, PLACEHOLDER_TITLE, PRICE_SENTINEL, RawRecord};

/// Clean and type the raw dataset.
///
/// Empty input yields empty output immediately. Any failure of the step
/// sequence itself aborts the whole transform and yields an empty dataset;
/// individual rows that fail validation are just dropped.
pub fn transform(records: &[RawRecord], exchange_rate: f64) -> Vec<CleanRecord> {
    if records.is_empty() {
        warn!("Input dataset is empty, nothing to transform");
        return Vec::new();
    }

    info!(rows = records.len(), "Starting transform");

    match run_steps(records, exchange_rate) {
        Ok(clean) => {
            info!(rows = clean.len(), "Transform finished");
            clean
        }
        Err(e) => {
            error!(error = %e, "Transform failed, returning empty dataset");
            Vec::new()
        }
    }
}

fn run_steps(records: &[RawRecord], exchange_rate: f64) -> Result<Vec<CleanRecord>> {
    if !exchange_rate.is_finite() || exchange_rate <= 0.0 {
        bail!("invalid exchange rate: {exchange_rate}");
    }

    let mut rows = Vec::new();

    for record in records {
        if record.title == PLACEHOLDER_TITLE {
            continue;
        }

        let price_idr = normalize_price(&record.price)
            .map(|price| (price * exchange_rate).round() as i64);
        let rating = normalize_rating(&record.rating);
        let colors = normalize_colors(&record.colors);
        let size = normalize_labeled(&record.size, "Size:");
        let gender = normalize_labeled(&record.gender, "Gender:");

        // Rows missing any required field are dropped; colors was already
        // defaulted and never disqualifies a row on its own.
        let (Some(price_idr), Some(rating), Some(size), Some(gender)) =
            (price_idr, rating, size, gender)
        else {
            continue;
        };

        rows.push(CleanRecord {
            title: record.title.clone(),
            price_idr,
            rating,
            colors,
            size,
            gender,
            extracted_at: record.extracted_at,
        });
    }

    Ok(dedup(rows))
}

/// Parse a raw price like "$102.15" or "$1,234.56" into its numeric value.
/// The price sentinel and anything unparsable map to missing.
fn normalize_price(raw: &str) -> Option<f64> {
    if raw == PRICE_SENTINEL {
        return None;
    }
    let stripped: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    stripped.trim().parse().ok()
}

/// The numeric rating is the third whitespace-delimited token of the raw
/// string ("Rating: ⭐ 3.9 / 5"). The sentinel has no numeric third token
/// and maps to missing, as does anything unparsable.
fn normalize_rating(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().nth(2)?;
    let value: f64 = token.parse().ok()?;
    Some(round_to_tenth(value))
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The color count is the first token of "3 Colors". The sentinel and any
/// unparsable count default to 1; this field never drops a row.
fn normalize_colors(raw: &str) -> i64 {
    if raw == NA_SENTINEL {
        return 1;
    }
    raw.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .unwrap_or(1)
}

/// Strip a fixed label prefix ("Size:" / "Gender:") and any trailing
/// separator punctuation; the shared sentinel maps to missing.
fn normalize_labeled(raw: &str, label: &str) -> Option<String> {
    if raw == NA_SENTINEL {
        return None;
    }
    let value = raw.strip_prefix(label).unwrap_or(raw);
    Some(value.trim().trim_end_matches(',').trim_end().to_string())
}

/// Remove rows that are exact duplicates of an earlier row across all
/// fields, keeping the first occurrence and the original relative order.
fn dedup(rows: Vec<CleanRecord>) -> Vec<CleanRecord> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row_key(row)))
        .collect()
}

fn row_key(row: &CleanRecord) -> (String, i64, u64, i64, String, String, DateTime<Utc>) {
    (
        row.title.clone(),
        row.price_idr,
        row.rating.to_bits(),
        row.colors,
        row.size.clone(),
        row.gender.clone(),
        row.extracted_at,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::RATING_SENTINEL;

    fn raw(
        title: &str,
        price: &str,
        rating: &str,
        colors: &str,
        size: &str,
        gender: &str,
    ) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            price: price.to_string(),
            rating: rating.to_string(),
            colors: colors.to_string(),
            size: size.to_string(),
            gender: gender.to_string(),
            extracted_at: Utc::now(),
        }
    }

    fn full_raw() -> RawRecord {
        raw(
            "T-shirt 2",
            "$102.15",
            "Rating: ⭐ 3.9 / 5",
            "3 Colors",
            "Size: M,",
            "Gender: Women,",
        )
    }

    #[test]
    fn cleans_a_fully_populated_record() {
        let rows = transform(&[full_raw()], 16000.0);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "T-shirt 2");
        assert_eq!(row.price_idr, 1_634_400);
        assert_eq!(row.rating, 3.9);
        assert_eq!(row.colors, 3);
        assert_eq!(row.size, "M");
        assert_eq!(row.gender, "Women");
    }

    #[test]
    fn drops_placeholder_titles_but_keeps_valid_rows() {
        let placeholder = raw(
            PLACEHOLDER_TITLE,
            "$10.00",
            "Rating: ⭐ 4.0 / 5",
            "2 Colors",
            "Size: L,",
            "Gender: Men,",
        );
        let rows = transform(&[placeholder, full_raw()], 16000.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "T-shirt 2");
    }

    #[test]
    fn all_invalid_input_yields_empty_dataset() {
        let placeholder = raw(
            PLACEHOLDER_TITLE,
            "$10.00",
            "Rating: ⭐ 4.0 / 5",
            "2 Colors",
            "Size: L,",
            "Gender: Men,",
        );
        let unpriced = raw(
            "Hoodie 7",
            PRICE_SENTINEL,
            "Rating: ⭐ 4.0 / 5",
            "2 Colors",
            "Size: L,",
            "Gender: Men,",
        );

        assert!(transform(&[placeholder, unpriced], 16000.0).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(transform(&[], 16000.0).is_empty());
    }

    #[test]
    fn price_sentinel_maps_to_missing() {
        assert_eq!(normalize_price(PRICE_SENTINEL), None);
        assert_eq!(normalize_price("$102.15"), Some(102.15));
        assert_eq!(normalize_price("$1,234.56"), Some(1234.56));
        assert_eq!(normalize_price("not a price"), None);
    }

    #[test]
    fn price_conversion_rounds_to_whole_units() {
        let mut record = full_raw();
        record.price = "$0.99".to_string();
        let rows = transform(&[record], 16000.0);

        assert_eq!(rows[0].price_idr, 15_840);
    }

    #[test]
    fn rating_sentinel_and_garbage_map_to_missing() {
        assert_eq!(normalize_rating(RATING_SENTINEL), None);
        assert_eq!(normalize_rating("Rating: ⭐ 3.9 / 5"), Some(3.9));
        assert_eq!(normalize_rating("Rating: ⭐ wow / 5"), None);
    }

    #[test]
    fn rating_rounds_to_one_decimal_place() {
        assert_eq!(normalize_rating("Rating: ⭐ 3.94 / 5"), Some(3.9));
        assert_eq!(normalize_rating("Rating: ⭐ 3.95 / 5"), Some(4.0));
    }

    #[test]
    fn rating_rounding_is_idempotent() {
        for value in [0.0, 3.9, 4.25, 4.949, 5.0] {
            let once = round_to_tenth(value);
            assert_eq!(round_to_tenth(once), once);
        }
    }

    #[test]
    fn colors_default_to_one_when_missing_or_unparsable() {
        assert_eq!(normalize_colors(NA_SENTINEL), 1);
        assert_eq!(normalize_colors("garbage Colors"), 1);
        assert_eq!(normalize_colors("3 Colors"), 3);
    }

    #[test]
    fn colors_sentinel_never_drops_a_row() {
        let mut record = full_raw();
        record.colors = NA_SENTINEL.to_string();
        let rows = transform(&[record], 16000.0);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].colors, 1);
    }

    #[test]
    fn labeled_fields_lose_prefix_and_trailing_comma() {
        assert_eq!(normalize_labeled("Size: M,", "Size:"), Some("M".to_string()));
        assert_eq!(
            normalize_labeled("Gender: Women,", "Gender:"),
            Some("Women".to_string())
        );
        assert_eq!(normalize_labeled(NA_SENTINEL, "Size:"), None);
    }

    #[test]
    fn rows_missing_required_fields_are_dropped() {
        for field in ["price", "rating", "size", "gender"] {
            let mut record = full_raw();
            match field {
                "price" => record.price = PRICE_SENTINEL.to_string(),
                "rating" => record.rating = RATING_SENTINEL.to_string(),
                "size" => record.size = NA_SENTINEL.to_string(),
                _ => record.gender = NA_SENTINEL.to_string(),
            }
            assert!(transform(&[record], 16000.0).is_empty(), "field: {field}");
        }
    }

    #[test]
    fn exact_duplicates_keep_first_occurrence() {
        let mut other = full_raw();
        other.title = "T-shirt 3".to_string();

        let first = full_raw();
        let rows = transform(&[first.clone(), first, other], 16000.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "T-shirt 2");
        assert_eq!(rows[1].title, "T-shirt 3");
    }

    #[test]
    fn dedup_is_idempotent() {
        let rows = transform(&[full_raw(), full_raw()], 16000.0);
        let again = dedup(rows.clone());

        assert_eq!(again, rows);
    }

    #[test]
    fn parsed_page_with_one_broken_card_yields_one_clean_row() {
        let html = r#"<html><body>
            <div class="collection-card">
                <h3 class="product-title">T-shirt 2</h3>
                <div class="price-container">$102.15</div>
                <div class="product-details">
                    <p>Rating: ⭐ 3.9 / 5</p>
                    <p>3 Colors</p>
                    <p>Size: M,</p>
                    <p>Gender: Women,</p>
                </div>
            </div>
            <div class="collection-card">
                <div class="price-container">$55.00</div>
                <div class="product-details">
                    <p>Rating: ⭐ 4.1 / 5</p>
                    <p>2 Colors</p>
                    <p>Size: S,</p>
                    <p>Gender: Men,</p>
                </div>
            </div>
        </body></html>"#;

        let run_at = Utc::now();
        let records: Vec<RawRecord> = crate::extractor::parse_cards(html)
            .unwrap()
            .into_iter()
            .map(|card| card.into_record(run_at))
            .collect();
        let rows = transform(&records, 16000.0);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "T-shirt 2");
        assert_eq!(row.price_idr, 1_634_400);
        assert_eq!(row.rating, 3.9);
        assert_eq!(row.colors, 3);
        assert_eq!(row.size, "M");
        assert_eq!(row.gender, "Women");
        assert_eq!(row.extracted_at, run_at);
    }

    #[test]
    fn invalid_exchange_rate_fails_closed() {
        assert!(transform(&[full_raw()], f64::NAN).is_empty());
        assert!(transform(&[full_raw()], -1.0).is_empty());
    }
}
