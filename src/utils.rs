//! Utility functions: shared HTTP client construction, string truncation
//! for logging, and the polite pause between page fetches.

use rand::{Rng, rng};
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Build the HTTP client shared by every scraper and by the API stage.
///
/// Carries the configured User-Agent, a French-first Accept-Language
/// header (the sources are mostly francophone), and the request timeout.
/// Each network call in the pipeline is bounded by this timeout; there is
/// no retry layer beyond it.
pub fn build_http_client(
    user_agent: &str,
    timeout_secs: u64,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.8"),
    );

    reqwest::Client::builder()
        .user_agent(user_agent.to_string())
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and a
/// remaining-character count appended. Counts characters rather than bytes
/// so accented French text never splits mid-codepoint.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…(+{} chars)", total - max)
    }
}

/// Sleep between one and two seconds before hitting a site again.
///
/// The sources are small newsrooms; detail pages are fetched sequentially
/// with this pause so a run never hammers them.
pub async fn polite_pause() {
    let millis: u64 = rng().random_range(1_000..=2_000);
    debug!(millis, "Pausing before next fetch");
    sleep(Duration::from_millis(millis)).await;
}
