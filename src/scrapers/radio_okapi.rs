//! Radio Okapi scraper.
//!
//! Radio Okapi (the MONUSCO-backed national radio) publishes dated article
//! URLs of the form `/YYYY/MM/DD/actualite/...`, which makes indexing from
//! the news landing page reliable: any anchor matching that pattern is an
//! article. Detail pages are Drupal nodes; the body lives in
//! `div.field-name-body` and the publication date in a "Publié le
//! DD/MM/YYYY" line.

use std::collections::HashSet;
use std::error::Error;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::{element_text, resolve_src};
use crate::models::Article;
use crate::utils::polite_pause;

const BASE_URL: &str = "https://www.radiookapi.net";
const LANDING_URL: &str = "https://www.radiookapi.net/actualite";
const SOURCE: &str = "Radio Okapi";

/// Article URLs embed their publication date.
static ARTICLE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/20\d{2}/\d{2}/\d{2}/actualite/").expect("valid article pattern"));

/// The `DD/MM/YYYY` date inside the "Publié le" line.
static PUBLISHED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2}/\d{2}/\d{4})").expect("valid date pattern"));

/// Scrape recent articles from the Radio Okapi news section.
///
/// Two phases: index article links from the landing page, then fetch each
/// detail page sequentially. A failed detail fetch is logged and skipped.
pub async fn scrape(client: &Client, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let html = client
        .get(LANDING_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let mut links = index_links(&html)?;
    info!(count = links.len(), source = SOURCE, "Indexed Radio Okapi articles");
    links.truncate(limit);

    let mut articles = Vec::new();
    for (url, link_title) in links {
        polite_pause().await;
        match fetch_article(client, &url, &link_title).await {
            Ok(Some(article)) => articles.push(article),
            Ok(None) => warn!(%url, "Radio Okapi article skipped (insufficient content)"),
            Err(e) => error!(error = %e, %url, "Radio Okapi article fetch failed"),
        }
    }

    info!(count = articles.len(), source = SOURCE, "Fetched Radio Okapi articles");
    Ok(articles)
}

/// Collect `(url, title)` pairs for every dated article link on the page.
fn index_links(html: &str) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let base_url = Url::parse(BASE_URL)?;
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")?;

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !ARTICLE_URL_RE.is_match(href) {
            continue;
        }
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        let url = resolved.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }
        let title = element_text(element);
        // Very short anchor texts are section labels, not headlines.
        if title.chars().count() <= 10 {
            continue;
        }
        links.push((url, title));
    }

    Ok(links)
}

async fn fetch_article(
    client: &Client,
    url: &str,
    link_title: &str,
) -> Result<Option<Article>, Box<dyn Error>> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_article(&body, url, link_title)
}

/// Extract a record from a detail page. Returns `Ok(None)` when the page
/// has no headline or not enough body text to be worth delivering.
fn parse_article(
    html: &str,
    url: &str,
    link_title: &str,
) -> Result<Option<Article>, Box<dyn Error>> {
    let base_url = Url::parse(BASE_URL)?;
    let document = Html::parse_document(html);
    let h1_selector = Selector::parse("h1")?;
    let body_selector = Selector::parse("div.field-name-body")?;
    let paragraph_selector = Selector::parse("p")?;
    let image_selector = Selector::parse("img")?;
    let og_image_selector = Selector::parse(r#"meta[property="og:image"]"#)?;

    // The detail page headline is more precise than the landing anchor.
    let title = document
        .select(&h1_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| link_title.to_string());

    let mut content_parts = Vec::new();
    if let Some(body_element) = document.select(&body_selector).next() {
        for paragraph in body_element.select(&paragraph_selector) {
            let text = element_text(paragraph);
            if text.chars().count() > 20 {
                content_parts.push(text);
            }
        }
    }
    let content = content_parts.join("\n\n");

    // Prefer an inline body image, fall back to the OpenGraph one.
    let mut image_url = document
        .select(&body_selector)
        .next()
        .and_then(|body| body.select(&image_selector).next())
        .and_then(|img| img.value().attr("src"))
        .map(|src| resolve_src(&base_url, src));
    if image_url.is_none() {
        image_url = document
            .select(&og_image_selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string);
    }

    let published_at = document
        .select(&paragraph_selector)
        .map(|p| p.text().collect::<String>())
        .find(|text| text.contains("Publié le"))
        .and_then(|text| PUBLISHED_RE.captures(&text).map(|c| c[1].to_string()));

    if title.is_empty() || content.chars().count() <= 100 {
        return Ok(None);
    }

    Ok(Some(Article {
        title: Some(title),
        url: url.to_string(),
        content: Some(content),
        summary: None,
        image_url,
        author: Some(SOURCE.to_string()),
        published_at,
        source: SOURCE.to_string(),
    }))
}
