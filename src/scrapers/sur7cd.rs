//! 7sur7.cd scraper.
//!
//! The 7sur7.cd front page is a Drupal site: each story sits in a
//! `div.views-row` block with a link and a thumbnail. Category and tag
//! pages share the same markup, so candidate links are filtered down to
//! `/index.php` article URLs before fetching the detail pages.

use std::error::Error;

use chrono::Local;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::{element_text, resolve_src};
use crate::models::Article;
use crate::utils::polite_pause;

const BASE_URL: &str = "https://www.7sur7.cd";
const SOURCE: &str = "7sur7.cd";

/// Body containers tried in order on a detail page.
const CONTENT_SELECTORS: &[&str] = &[
    "div.field-item.even",
    "div.field-name-body div.field-item",
    "div.article-content",
    "div.content",
    "article .content",
    ".node-content",
];

const DATE_SELECTORS: &[&str] = &["span.date-display-single", "time", ".submitted", ".date"];

const AUTHOR_SELECTORS: &[&str] = &[".username", ".author", ".submitted a"];

/// A story block from the front page: link, anchor title, and thumbnail.
#[derive(Debug)]
struct StoryLink {
    url: String,
    title: String,
    image_url: Option<String>,
}

/// Scrape recent articles from the 7sur7.cd front page.
pub async fn scrape(client: &Client, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let html = client
        .get(BASE_URL)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let mut links = index_links(&html)?;
    info!(count = links.len(), source = SOURCE, "Indexed 7sur7.cd articles");
    links.truncate(limit);

    let mut articles = Vec::new();
    for link in links {
        polite_pause().await;
        match fetch_article(client, &link).await {
            Ok(Some(article)) => articles.push(article),
            Ok(None) => warn!(url = %link.url, "7sur7.cd article skipped (no content)"),
            Err(e) => error!(error = %e, url = %link.url, "7sur7.cd article fetch failed"),
        }
    }

    info!(count = articles.len(), source = SOURCE, "Fetched 7sur7.cd articles");
    Ok(articles)
}

/// Whether a link from a story block points at an actual article rather
/// than a category or tag page.
fn is_article_url(url: &str) -> bool {
    if url.contains("/category/") || url.contains("/tag/") {
        return false;
    }
    if url.ends_with("/politique")
        || url.ends_with("/societe")
        || url.ends_with("/sport")
        || url.ends_with("/sante")
    {
        return false;
    }
    url.contains("/index.php")
}

fn index_links(html: &str) -> Result<Vec<StoryLink>, Box<dyn Error>> {
    let base_url = Url::parse(BASE_URL)?;
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("div.views-row")?;
    let anchor_selector = Selector::parse("a")?;
    let image_selector = Selector::parse("img")?;

    let mut links = Vec::new();
    for block in document.select(&row_selector) {
        let Some(anchor) = block.select(&anchor_selector).next() else {
            continue;
        };
        let title = element_text(anchor);
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            match base_url.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        };
        if !is_article_url(&url) {
            continue;
        }

        let image_url = block
            .select(&image_selector)
            .next()
            .and_then(image_src)
            .map(|src| resolve_src(&base_url, &src));

        links.push(StoryLink { url, title, image_url });
    }

    Ok(links)
}

/// `src` with a lazy-loading `data-src` fallback.
fn image_src(img: ElementRef<'_>) -> Option<String> {
    img.value()
        .attr("src")
        .or_else(|| img.value().attr("data-src"))
        .map(str::to_string)
}

async fn fetch_article(client: &Client, link: &StoryLink) -> Result<Option<Article>, Box<dyn Error>> {
    let body = client
        .get(&link.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_article(&body, link))
}

/// Extract a record from a detail page. Returns `None` when no body text
/// could be found under any known container.
fn parse_article(html: &str, link: &StoryLink) -> Option<Article> {
    let base_url = Url::parse(BASE_URL).ok()?;
    let document = Html::parse_document(html);
    let h1_selector = Selector::parse("h1").ok()?;
    let paragraph_selector = Selector::parse("p").ok()?;

    // The detail page headline is more precise than the front-page anchor.
    let title = document
        .select(&h1_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| link.title.clone());

    let mut content = String::new();
    for css in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            let parts: Vec<String> = container
                .select(&paragraph_selector)
                .map(element_text)
                .filter(|text| text.chars().count() > 10)
                .collect();
            content = parts.join(" ");
            if !content.is_empty() {
                break;
            }
        }
    }
    // Last resort: any paragraph under the node or the main column.
    if content.is_empty() {
        for css in ["div.node", "main"] {
            let Ok(selector) = Selector::parse(css) else {
                continue;
            };
            if let Some(container) = document.select(&selector).next() {
                let parts: Vec<String> = container
                    .select(&paragraph_selector)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect();
                content = parts.join(" ");
                if !content.is_empty() {
                    break;
                }
            }
        }
    }
    if content.is_empty() {
        return None;
    }

    let published_at = DATE_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(element_text)
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

    let author = AUTHOR_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(element_text)
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| SOURCE.to_string());

    // Prefer the front-page thumbnail, else look for one in the article.
    let image_url = link.image_url.clone().or_else(|| {
        Selector::parse("article img, .content img, .field-name-body img")
            .ok()
            .and_then(|selector| document.select(&selector).next())
            .and_then(image_src)
            .map(|src| resolve_src(&base_url, &src))
    });

    Some(Article {
        title: Some(title),
        url: link.url.clone(),
        content: Some(content),
        summary: None,
        image_url,
        author: Some(author),
        published_at: Some(published_at),
        source: SOURCE.to_string(),
    })
}
