//! Card parsing and the page-by-page extraction loop

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, warn};

use crate::fetcher::FetchOutcome;
use crate::models::{NA_SENTINEL, PLACEHOLDER_TITLE, PRICE_SENTINEL, RATING_SENTINEL};
use crate::models::{RawFieldSet, RawRecord};
use crate::traits::PageFetcher;

/// Category assigned to one descriptive paragraph inside a card.
///
/// Predicates are evaluated in declaration order, so a paragraph matching
/// more than one test is classified by the first. If two paragraphs match
/// the same category, the later one overwrites the earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Rating,
    Colors,
    Size,
    Gender,
    Unrecognized,
}

impl FieldKind {
    pub fn classify(text: &str) -> Self {
        if text.starts_with("Rating:") {
            Self::Rating
        } else if text.contains("Colors") && text.ends_with("Colors") {
            Self::Colors
        } else if text.starts_with("Size:") {
            Self::Size
        } else if text.starts_with("Gender:") {
            Self::Gender
        } else {
            Self::Unrecognized
        }
    }
}

/// Extract the raw string fields of every product card on one page.
///
/// A card missing an element yields the sentinel for that field, never an
/// absent value. Zero cards on the page yields an empty vector; the caller
/// decides what an empty page means.
pub fn parse_cards(html: &str) -> Result<Vec<RawFieldSet>> {
    let document = Html::parse_document(html);

    let card_selector = Selector::parse("div.collection-card")
        .map_err(|e| anyhow!("Failed to parse card selector: {e:?}"))?;
    let title_selector = Selector::parse("h3.product-title")
        .map_err(|e| anyhow!("Failed to parse title selector: {e:?}"))?;
    let price_selector = Selector::parse(".price-container")
        .map_err(|e| anyhow!("Failed to parse price selector: {e:?}"))?;
    let details_selector = Selector::parse("div.product-details")
        .map_err(|e| anyhow!("Failed to parse details selector: {e:?}"))?;
    let paragraph_selector = Selector::parse("p")
        .map_err(|e| anyhow!("Failed to parse paragraph selector: {e:?}"))?;

    let mut cards = Vec::new();

    for card in document.select(&card_selector) {
        let title = card
            .select(&title_selector)
            .next()
            .map_or_else(|| PLACEHOLDER_TITLE.to_string(), element_text);

        let price = card
            .select(&price_selector)
            .next()
            .map_or_else(|| PRICE_SENTINEL.to_string(), element_text);

        let mut fields = RawFieldSet {
            title,
            price,
            rating: RATING_SENTINEL.to_string(),
            colors: NA_SENTINEL.to_string(),
            size: NA_SENTINEL.to_string(),
            gender: NA_SENTINEL.to_string(),
        };

        if let Some(details) = card.select(&details_selector).next() {
            for paragraph in details.select(&paragraph_selector) {
                let text = element_text(paragraph);
                match FieldKind::classify(&text) {
                    FieldKind::Rating => fields.rating = text,
                    FieldKind::Colors => fields.colors = text,
                    FieldKind::Size => fields.size = text,
                    FieldKind::Gender => fields.gender = text,
                    FieldKind::Unrecognized => {}
                }
            }
        }

        cards.push(fields);
    }

    Ok(cards)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Page 1 lives at the site root; later pages at a numbered path.
fn page_url(base_url: &str, page: u32) -> String {
    if page == 1 {
        format!("{base_url}/")
    } else {
        format!("{base_url}/page{page}")
    }
}

/// Scrape the catalog sequentially from page 1 to `total_pages`.
///
/// Per-page policy: a 404 or an empty later page stops the loop (pagination
/// exhausted); an empty first page and any transient or unexpected failure
/// skip just that page. Every accumulated record shares `extracted_at`.
/// Returns whatever was accumulated, possibly nothing.
pub async fn extract(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    total_pages: u32,
    extracted_at: DateTime<Utc>,
) -> Vec<RawRecord> {
    let mut records = Vec::new();

    info!(base_url, total_pages, "Starting extraction");

    for page in 1..=total_pages {
        let url = page_url(base_url, page);
        info!(page, total_pages, url = %url, "Scraping page");

        match fetcher.fetch(&url).await {
            FetchOutcome::Success(html) => match parse_cards(&html) {
                Ok(cards) if cards.is_empty() => {
                    if page == 1 {
                        warn!(page, "No product cards on page 1, continuing");
                        continue;
                    }
                    warn!(page, "No product cards found, stopping");
                    break;
                }
                Ok(cards) => {
                    info!(page, count = cards.len(), "Found products");
                    records.extend(cards.into_iter().map(|card| card.into_record(extracted_at)));
                }
                Err(e) => {
                    error!(page, error = %e, "Failed to parse page, skipping");
                }
            },
            FetchOutcome::NotFound => {
                warn!(page, "Page not found (404), stopping");
                break;
            }
            FetchOutcome::TransientError(reason) => {
                error!(page, reason = %reason, "Request failed, skipping page");
            }
            FetchOutcome::UnexpectedError(reason) => {
                error!(page, reason = %reason, "Unexpected error, skipping page");
            }
        }
    }

    if records.is_empty() {
        warn!("No records were extracted");
    } else {
        info!(total = records.len(), "Extraction finished");
    }

    records
}
