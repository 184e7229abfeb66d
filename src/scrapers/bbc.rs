//! BBC News landing-page scraper.
//!
//! Only the landing page is read: promo headlines carry enough metadata
//! (title, link, teaser paragraph) for the pipeline, and BBC article pages
//! are heavy and change markup often. Records therefore ship without
//! content or date; the recency filter keeps them (fail open) and the
//! categorizer works from the title and teaser.

use std::collections::HashSet;
use std::error::Error;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::element_text;
use crate::models::Article;

const BASE_URL: &str = "https://www.bbc.com";
const LANDING_URL: &str = "https://www.bbc.com/news";
const SOURCE: &str = "BBC News";

/// Scrape promo headlines from the BBC News landing page.
pub async fn scrape(client: &Client, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let html = client
        .get(LANDING_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let articles = parse_landing(&html, limit)?;
    info!(count = articles.len(), source = SOURCE, "Indexed BBC News articles");
    Ok(articles)
}

/// Extract article records from the landing page markup.
fn parse_landing(html: &str, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let base_url = Url::parse(BASE_URL)?;
    let document = Html::parse_document(html);
    // Promo headings plus a generic fallback for anything linking into /news/.
    let promo_selector = Selector::parse(r#"a.gs-c-promo-heading, a[href*="/news/"]"#)?;
    let paragraph_selector = Selector::parse("p")?;

    let mut articles = Vec::new();
    let mut seen = HashSet::new();
    for element in document.select(&promo_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let title = element_text(element);
        if title.is_empty() {
            continue;
        }

        let url = if href.starts_with('/') {
            match base_url.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        } else {
            href.to_string()
        };
        if !seen.insert(url.clone()) {
            continue;
        }

        // Teaser text lives in a sibling paragraph of the promo link.
        let summary = element
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.select(&paragraph_selector).next())
            .map(element_text)
            .filter(|s| !s.is_empty());

        debug!(%url, "Found BBC News promo link");
        articles.push(Article {
            title: Some(title),
            url,
            content: None,
            summary,
            image_url: None,
            author: None,
            published_at: None,
            source: SOURCE.to_string(),
        });
        if articles.len() >= limit {
            break;
        }
    }

    Ok(articles)
}
