//! Data models for scraped news articles and per-run statistics.
//!
//! This module defines the core data structures flowing through the pipeline:
//! - [`Article`]: a normalized article record produced by the site scrapers
//! - [`RunStats`]: aggregate counts produced by the deduplication stage
//!
//! Records are never mutated after a scraper creates them; the category is a
//! pure derivation computed at delivery time and only exists in the outgoing
//! payload.

/// A normalized news article as produced by a site scraper.
///
/// The `url` is the identifying key for deduplication and existence
/// checking. Scrapers only emit records for linked articles, so `url` is a
/// plain `String`; an empty value is treated as a missing identifier and the
/// record is excluded from deduplication downstream.
///
/// All other fields are optional because each source exposes a different
/// subset of metadata. `published_at` is kept as the raw string the site
/// published (several formats are in the wild) and is only parsed by the
/// recency filter.
#[derive(Debug, Clone)]
pub struct Article {
    /// The article headline, when one was found.
    pub title: Option<String>,
    /// The canonical article URL. Identifying key within a run.
    pub url: String,
    /// Full article body text, when a detail page was fetched.
    pub content: Option<String>,
    /// A short teaser paragraph, when the landing page offered one.
    pub summary: Option<String>,
    /// URL of the lead image.
    pub image_url: Option<String>,
    /// Author byline; detail-page scrapers default this to the source name.
    pub author: Option<String>,
    /// Raw publication date string as found on the site.
    pub published_at: Option<String>,
    /// Name of the origin site (e.g. "Radio Okapi").
    pub source: String,
}

impl Article {
    /// The URL usable for deduplication, or `None` when the record carries
    /// no identifier and cannot be tracked across runs.
    pub fn identifying_url(&self) -> Option<&str> {
        if self.url.is_empty() {
            None
        } else {
            Some(self.url.as_str())
        }
    }
}

/// Filtering statistics for a single pipeline invocation.
///
/// Owned by the orchestrator for the duration of one run and reset on every
/// invocation. `total` counts the records entering the filter stage; the
/// other three partition them into survivors (`new`), records the remote
/// store already knows (`existing`), and records outside the recency window
/// (`old`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records entering the filter stage.
    pub total: usize,
    /// Records that survived every filter.
    pub new: usize,
    /// Records the remote store already knows.
    pub existing: usize,
    /// Records older than the recency threshold.
    pub old: usize,
}

impl RunStats {
    /// Share of incoming records that survived, as a percentage.
    /// `None` when the run saw no records at all.
    pub fn novelty_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.new as f64 / self.total as f64 * 100.0)
        }
    }
}
