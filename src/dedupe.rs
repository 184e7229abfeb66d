//! Article deduplication: in-batch URL dedup, recency filtering, and
//! reconciliation against the remote store.
//!
//! Every decision here fails open. A record with no usable date is kept, a
//! date that will not parse is kept (with a warning), and an unreachable
//! existence-check endpoint means every candidate is treated as new. The
//! pipeline prefers delivering a duplicate over silently dropping a story.
//!
//! Filtering order matters: the recency window is evaluated locally first so
//! the existence check (one network round-trip) only ever sees records that
//! are worth delivering at all.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::{Article, RunStats};

/// `/YYYY/MM/DD/` path segment, as used by Radio Okapi article URLs.
static URL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").expect("valid URL date pattern"));

/// Parse a publication date string in one of the formats the sources use.
///
/// Supported shapes:
/// - ISO-8601-like with a `T` separator; a trailing `Z` or an explicit
///   offset is stripped rather than honored, keeping the wall-clock time
///   (known simplification, articles near the window boundary from non-UTC
///   sources may be misclassified)
/// - `DD/MM/YYYY`
/// - `YYYY-MM-DD`
///
/// Anything else yields `None`, which callers treat as "no usable date".
pub fn parse_published_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.contains('T') {
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            // naive_local() drops the offset without converting.
            return Some(date.naive_local());
        }
        let stripped = raw.trim_end_matches('Z');
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(date) = NaiveDateTime::parse_from_str(stripped, format) {
                return Some(date);
            }
        }
        None
    } else if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%d/%m/%Y")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    } else if raw.contains('-') {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    } else {
        None
    }
}

/// Extract a publication date from a `/YYYY/MM/DD/` segment in the URL
/// path. Returns `None` when the pattern is absent or names an impossible
/// calendar date.
pub fn extract_date_from_url(url: &str) -> Option<NaiveDateTime> {
    let captures = URL_DATE_RE.captures(url)?;
    let year: i32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let day: u32 = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(NaiveTime::MIN))
}

/// Whether `date` falls within the last `hours_threshold` hours.
///
/// Comparison is timezone-naive against the local clock throughout.
pub fn is_recent_date(date: NaiveDateTime, hours_threshold: i64) -> bool {
    date >= Local::now().naive_local() - Duration::hours(hours_threshold)
}

/// Whether a raw publication date string is within the recency window.
///
/// Fails open: a missing, empty, or unparseable date keeps the record.
pub fn is_recent_article(published: Option<&str>, hours_threshold: i64) -> bool {
    let Some(raw) = published.filter(|s| !s.is_empty()) else {
        return true;
    };
    match parse_published_date(raw) {
        Some(date) => is_recent_date(date, hours_threshold),
        None => {
            warn!(raw_date = %raw, "Unrecognized publication date format; keeping article");
            true
        }
    }
}

/// Whether `article` passes the recency filter, falling back to a date
/// embedded in its URL when the record carries none.
fn article_is_recent(article: &Article, hours_threshold: i64) -> bool {
    match article.published_at.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => is_recent_article(Some(raw), hours_threshold),
        None => match extract_date_from_url(&article.url) {
            Some(date) => is_recent_date(date, hours_threshold),
            None => true,
        },
    }
}

/// Drop in-batch duplicates, keeping the first occurrence of every URL.
/// Records without an identifying URL cannot be deduplicated and are
/// dropped here.
pub fn dedupe_by_url(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| article.identifying_url().is_some())
        .unique_by(|article| article.url.clone())
        .collect()
}

/// Filter a batch down to the records worth delivering.
///
/// Applies the recency window first (locally, no network), then -- when
/// `check_existing` is set and any records survived -- reconciles the
/// survivors' URLs against the remote store in a single call. Returns the
/// surviving records together with the run's [`RunStats`].
pub async fn filter_new_articles(
    articles: Vec<Article>,
    api: &ApiClient,
    check_existing: bool,
    hours_threshold: i64,
) -> (Vec<Article>, RunStats) {
    if articles.is_empty() {
        return (Vec::new(), RunStats::default());
    }

    let mut stats = RunStats {
        total: articles.len(),
        ..RunStats::default()
    };

    let mut recent = Vec::new();
    for article in articles {
        if article_is_recent(&article, hours_threshold) {
            recent.push(article);
        } else {
            stats.old += 1;
        }
    }
    info!(
        recent = recent.len(),
        total = stats.total,
        hours_threshold,
        "Applied recency filter"
    );

    if check_existing && !recent.is_empty() {
        let urls: Vec<String> = recent
            .iter()
            .filter_map(|article| article.identifying_url())
            .map(str::to_string)
            .collect();
        let check = api.check_existing(&urls).await;

        let new_urls: HashSet<&str> = check.new.iter().map(String::as_str).collect();
        let survivors: Vec<Article> = recent
            .into_iter()
            .filter(|article| {
                article
                    .identifying_url()
                    .is_some_and(|url| new_urls.contains(url))
            })
            .collect();

        stats.existing = check.existing.len();
        stats.new = survivors.len();
        info!(
            new = stats.new,
            existing = stats.existing,
            "Reconciled against remote store"
        );
        (survivors, stats)
    } else {
        stats.new = recent.len();
        (recent, stats)
    }
}

/// Log the filtering statistics summary for a run.
pub fn log_run_stats(label: &str, stats: &RunStats) {
    info!(
        source = label,
        total = stats.total,
        new = stats.new,
        existing = stats.existing,
        old = stats.old,
        novelty_rate = %stats
            .novelty_rate()
            .map(|rate| format!("{rate:.1}%"))
            .unwrap_or_else(|| "N/A".to_string()),
        "Filtering statistics"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn article(url: &str, published_at: Option<&str>) -> Article {
        Article {
            title: Some("Un titre d'article".to_string()),
            url: url.to_string(),
            content: None,
            summary: None,
            image_url: None,
            author: None,
            published_at: published_at.map(str::to_string),
            source: "Radio Okapi".to_string(),
        }
    }

    fn offline_api() -> ApiClient {
        // Port 1 is never listening; only tests that skip the existence
        // check use this client.
        ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1/articles")
    }

    #[test]
    fn test_parse_iso_date_with_t_separator() {
        let parsed = parse_published_date("2025-10-05T14:30:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 10, 5).unwrap());
        assert_eq!(parsed.hour(), 14);
    }

    #[test]
    fn test_parse_iso_date_strips_offset_keeps_wall_clock() {
        let zulu = parse_published_date("2025-10-05T14:30:00Z").unwrap();
        let offset = parse_published_date("2025-10-05T14:30:00+02:00").unwrap();
        assert_eq!(zulu.hour(), 14);
        assert_eq!(offset.hour(), 14);
    }

    #[test]
    fn test_parse_slash_date() {
        let parsed = parse_published_date("14/03/2025").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(parsed.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_parse_dash_date() {
        let parsed = parse_published_date("2025-03-14").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_unrecognized_shapes() {
        assert!(parse_published_date("il y a deux heures").is_none());
        assert!(parse_published_date("99/99/2025").is_none());
        assert!(parse_published_date("").is_none());
    }

    #[test]
    fn test_extract_date_from_url() {
        let date = extract_date_from_url(
            "https://www.radiookapi.net/2025/03/14/actualite/politique/un-titre",
        )
        .unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_extract_date_from_url_without_pattern() {
        assert!(extract_date_from_url("https://example.cd/article-123.html").is_none());
    }

    #[test]
    fn test_extract_date_from_url_impossible_date() {
        assert!(extract_date_from_url("https://example.cd/2025/13/45/article").is_none());
    }

    #[test]
    fn test_future_date_is_recent() {
        assert!(is_recent_article(Some("2099-01-01"), 24));
    }

    #[test]
    fn test_stale_date_is_not_recent() {
        let two_days_ago = (Local::now() - Duration::hours(48))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert!(!is_recent_article(Some(&two_days_ago), 24));
    }

    #[test]
    fn test_missing_or_unparseable_date_is_kept() {
        assert!(is_recent_article(None, 24));
        assert!(is_recent_article(Some(""), 24));
        assert!(is_recent_article(Some("date inconnue"), 24));
    }

    #[test]
    fn test_dedupe_by_url_removes_in_batch_duplicates() {
        let mut batch = Vec::new();
        for i in 0..8 {
            batch.push(article(&format!("https://example.cd/a{i}"), None));
        }
        // Three records share one URL: 10 records, 8 distinct.
        batch.push(article("https://example.cd/a0", None));
        batch.push(article("https://example.cd/a0", None));
        assert_eq!(batch.len(), 10);

        let deduped = dedupe_by_url(batch);
        assert_eq!(deduped.len(), 8);
    }

    #[test]
    fn test_dedupe_by_url_keeps_first_occurrence() {
        let mut first = article("https://example.cd/a", None);
        first.title = Some("Première version".to_string());
        let mut second = article("https://example.cd/a", None);
        second.title = Some("Seconde version".to_string());

        let deduped = dedupe_by_url(vec![first, second]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title.as_deref(), Some("Première version"));
    }

    #[test]
    fn test_dedupe_by_url_drops_records_without_identifier() {
        let batch = vec![article("", None), article("https://example.cd/a", None)];
        let deduped = dedupe_by_url(batch);
        assert_eq!(deduped.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_with_check_disabled_counts_all_recent_as_new() {
        let batch: Vec<Article> = (0..5)
            .map(|i| article(&format!("https://example.cd/a{i}"), Some("2099-01-01")))
            .collect();

        let (survivors, stats) = filter_new_articles(batch, &offline_api(), false, 24).await;

        assert_eq!(survivors.len(), 5);
        assert_eq!(
            stats,
            RunStats {
                total: 5,
                new: 5,
                existing: 0,
                old: 0
            }
        );
    }

    #[tokio::test]
    async fn test_filter_partitions_old_articles() {
        let mut batch: Vec<Article> = (0..3)
            .map(|i| article(&format!("https://example.cd/a{i}"), Some("2099-01-01")))
            .collect();
        batch.push(article("https://example.cd/old1", Some("2020-01-01")));
        batch.push(article("https://example.cd/old2", Some("01/01/2020")));

        let (survivors, stats) = filter_new_articles(batch, &offline_api(), false, 24).await;

        assert_eq!(survivors.len(), 3);
        assert_eq!(
            stats,
            RunStats {
                total: 5,
                new: 3,
                existing: 0,
                old: 2
            }
        );
    }

    #[tokio::test]
    async fn test_filter_uses_url_date_when_record_has_none() {
        let batch = vec![article("https://example.cd/2020/01/01/actualite/vieux", None)];
        let (survivors, stats) = filter_new_articles(batch, &offline_api(), false, 24).await;
        assert!(survivors.is_empty());
        assert_eq!(stats.old, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_short_circuits() {
        let (survivors, stats) = filter_new_articles(Vec::new(), &offline_api(), true, 24).await;
        assert!(survivors.is_empty());
        assert_eq!(stats, RunStats::default());
    }

    #[tokio::test]
    async fn test_filter_drops_articles_reported_existing() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let existing_urls: Vec<String> = (0..3)
            .map(|i| format!("https://example.cd/a{i}"))
            .collect();
        Mock::given(method("POST"))
            .and(path("/api/articles/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "existing": existing_urls.clone(),
                "new": [],
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(
            reqwest::Client::new(),
            format!("{}/api/articles", server.uri()),
        );

        let mut batch: Vec<Article> = existing_urls
            .iter()
            .map(|url| article(url, Some("2099-01-01")))
            .collect();
        batch.push(article("https://example.cd/old1", Some("2020-01-01")));
        batch.push(article("https://example.cd/old2", Some("2020-01-01")));

        let (survivors, stats) = filter_new_articles(batch, &api, true, 24).await;

        assert!(survivors.is_empty());
        assert_eq!(
            stats,
            RunStats {
                total: 5,
                new: 0,
                existing: 3,
                old: 2
            }
        );
    }
}
