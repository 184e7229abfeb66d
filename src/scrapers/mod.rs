//! Site scrapers producing normalized [`Article`](crate::models::Article)
//! records.
//!
//! Each scraper is an independent adapter with a uniform contract:
//! `scrape(client, limit)` returns a finite list of normalized records, or
//! an error the orchestrator logs before moving on to the next source.
//! Adapters share no state and make no ordering guarantee between sources.
//!
//! # Registered Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | BBC News | [`bbc`] | landing page only | promo headlines + teaser paragraph |
//! | France24 | [`france24`] | landing page only | English landing page headlines |
//! | MediaCongo | [`mediacongo`] | landing + detail pages | several landing URLs tried in order |
//! | Radio Okapi | [`radio_okapi`] | landing + detail pages | dated article URLs, body paragraphs |
//! | 7sur7.cd | [`sur7cd`] | landing + detail pages | Drupal views rows |
//!
//! # Common Patterns
//!
//! Detail-page scrapers fetch sequentially with a 1-2 s pause between
//! requests. Failed article fetches are logged and skipped without failing
//! the source; a failed landing fetch fails the whole source.
//!
//! New sources are added here: one module with a `scrape` function, one
//! entry in [`SOURCES`], one arm in [`run`].

use std::error::Error;

use reqwest::Client;
use scraper::ElementRef;
use url::Url;

use crate::models::Article;

pub mod bbc;
pub mod france24;
pub mod mediacongo;
pub mod radio_okapi;
pub mod sur7cd;

/// Names of every registered scraper, in run order.
pub const SOURCES: &[&str] = &["bbc", "france24", "mediacongo", "radio_okapi", "sur7cd"];

/// Run the scraper registered under `name`.
pub async fn run(
    name: &str,
    client: &Client,
    limit: usize,
) -> Result<Vec<Article>, Box<dyn Error>> {
    match name {
        "bbc" => bbc::scrape(client, limit).await,
        "france24" => france24::scrape(client, limit).await,
        "mediacongo" => mediacongo::scrape(client, limit).await,
        "radio_okapi" => radio_okapi::scrape(client, limit).await,
        "sur7cd" => sur7cd::scrape(client, limit).await,
        other => Err(format!("unknown source module: {other}").into()),
    }
}

/// Collect an element's text with whitespace collapsed, the way the sites
/// render it.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an image `src` attribute against the site base: protocol-relative
/// and root-relative paths become absolute, anything else passes through.
pub(crate) fn resolve_src(base: &Url, src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else if src.starts_with('/') {
        base.join(src)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| src.to_string())
    } else {
        src.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  Un   titre\n  d'article  </p>");
        let selector = Selector::parse("p").unwrap();
        let element = html.select(&selector).next().unwrap();
        assert_eq!(element_text(element), "Un titre d'article");
    }

    #[test]
    fn test_resolve_src_protocol_relative() {
        let base = Url::parse("https://www.radiookapi.net").unwrap();
        assert_eq!(
            resolve_src(&base, "//cdn.example/img.jpg"),
            "https://cdn.example/img.jpg"
        );
    }

    #[test]
    fn test_resolve_src_root_relative() {
        let base = Url::parse("https://www.radiookapi.net").unwrap();
        assert_eq!(
            resolve_src(&base, "/sites/default/img.jpg"),
            "https://www.radiookapi.net/sites/default/img.jpg"
        );
    }

    #[test]
    fn test_resolve_src_absolute_passthrough() {
        let base = Url::parse("https://www.7sur7.cd").unwrap();
        assert_eq!(
            resolve_src(&base, "https://cdn.example/img.jpg"),
            "https://cdn.example/img.jpg"
        );
    }
}
