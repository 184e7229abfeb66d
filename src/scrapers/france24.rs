//! France24 landing-page scraper.
//!
//! Reads headline links from the English landing page. Like the BBC
//! adapter this one stays on the landing page, so records carry a title and
//! URL only.

use std::collections::HashSet;
use std::error::Error;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

use super::element_text;
use crate::models::Article;

const BASE_URL: &str = "https://www.france24.com";
const LANDING_URL: &str = "https://www.france24.com/en/";
const SOURCE: &str = "France24";

/// Scrape headline links from the France24 landing page.
pub async fn scrape(client: &Client, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let html = client
        .get(LANDING_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let articles = parse_landing(&html, limit)?;
    info!(count = articles.len(), source = SOURCE, "Indexed France24 articles");
    Ok(articles)
}

fn parse_landing(html: &str, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let base_url = Url::parse(BASE_URL)?;
    let document = Html::parse_document(html);
    let title_link_selector = Selector::parse("a.td-title-link")?;

    let mut articles = Vec::new();
    let mut seen = HashSet::new();
    for element in document.select(&title_link_selector) {
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

        articles.push(Article {
            title: Some(title),
            url,
            content: None,
            summary: None,
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
