//! MediaCongo scraper.
//!
//! MediaCongo's landing pages move around, so several are tried in order
//! until one yields article links (`article-actualite-*.html` URLs). The
//! detail pages have no stable markup either; every field is extracted
//! through a fallback chain of selectors, with the source name standing in
//! for a missing byline and today's date for a missing timestamp.

use std::collections::HashSet;
use std::error::Error;

use chrono::Local;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info, warn};
use url::Url;

use super::{element_text, resolve_src};
use crate::models::Article;
use crate::utils::polite_pause;

const BASE_URL: &str = "https://www.mediacongo.net";
const SOURCE: &str = "MediaCongo";

/// Landing pages tried in order until one yields article links.
const LANDING_URLS: &[&str] = &[
    "https://www.mediacongo.net/",
    "https://www.mediacongo.net/actualite/",
    "https://www.mediacongo.net/politique/",
    "https://www.mediacongo.net/economie/",
];

const TITLE_SELECTORS: &[&str] = &[
    "h1.article-title",
    "h1.entry-title",
    "h1.post-title",
    ".article-header h1",
    ".content-header h1",
    "h1",
];

const CONTENT_SELECTORS: &[&str] = &[
    r#"[class*="text"]"#,
    ".article-content",
    ".entry-content",
    ".post-content",
    ".content-body",
    r#"[itemprop="articleBody"]"#,
    ".article-body",
];

const IMAGE_SELECTORS: &[&str] = &[
    ".article-image img",
    ".featured-image img",
    ".post-thumbnail img",
    "article img",
    ".content img",
    ".entry-content img",
];

const DATE_SELECTORS: &[&str] = &[
    ".article-date",
    ".published-date",
    ".post-date",
    ".date",
    ".timestamp",
];

const AUTHOR_SELECTORS: &[&str] = &[
    ".article-author",
    ".byline",
    ".author-name",
    ".post-author",
    r#"[rel="author"]"#,
    ".author",
    ".writer",
];

/// Scrape recent articles from MediaCongo.
pub async fn scrape(client: &Client, limit: usize) -> Result<Vec<Article>, Box<dyn Error>> {
    let mut links: Vec<(String, String)> = Vec::new();
    for landing in LANDING_URLS {
        info!(url = landing, "Trying MediaCongo landing page");
        let html = match fetch_text(client, landing).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, url = landing, "MediaCongo landing fetch failed");
                continue;
            }
        };
        links = index_links(&html)?;
        if !links.is_empty() {
            break;
        }
    }

    if links.is_empty() {
        warn!(source = SOURCE, "No article links found on any landing page");
        return Ok(Vec::new());
    }
    info!(count = links.len(), source = SOURCE, "Indexed MediaCongo articles");
    links.truncate(limit);

    let mut articles = Vec::new();
    for (url, link_title) in links {
        polite_pause().await;
        match fetch_article(client, &url, &link_title).await {
            Ok(Some(article)) => articles.push(article),
            Ok(None) => warn!(%url, "MediaCongo article skipped (insufficient content)"),
            Err(e) => error!(error = %e, %url, "MediaCongo article fetch failed"),
        }
    }

    info!(count = articles.len(), source = SOURCE, "Fetched MediaCongo articles");
    Ok(articles)
}

async fn fetch_text(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

/// Whether a URL points at a MediaCongo article page.
fn is_article_url(url: &str) -> bool {
    if !url.contains(".html") {
        return false;
    }
    url.contains("article-actualite-") || url.contains("dossier-mediacongo-")
}

/// Collect `(url, title)` pairs for article links on a landing page.
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
        let title = element_text(element);
        // Anything shorter is a nav label, not a headline.
        if title.chars().count() < 15 {
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
        if seen.insert(url.clone()) {
            links.push((url, title));
        }
    }

    Ok(links)
}

async fn fetch_article(
    client: &Client,
    url: &str,
    link_title: &str,
) -> Result<Option<Article>, Box<dyn Error>> {
    let body = fetch_text(client, url).await?;
    Ok(parse_article(&body, url, link_title))
}

/// Extract a record from a detail page through the selector fallback
/// chains. Returns `None` when no chain yields enough body text.
fn parse_article(html: &str, url: &str, link_title: &str) -> Option<Article> {
    let base_url = Url::parse(BASE_URL).ok()?;
    let document = Html::parse_document(html);

    let mut content = first_text_over(&document, CONTENT_SELECTORS, 200);
    if content.is_none() {
        let fallback = paragraph_fallback(&document);
        if !fallback.is_empty() {
            content = Some(fallback);
        }
    }
    let content = content.filter(|c| c.chars().count() >= 200)?;

    let title = first_text_over(&document, TITLE_SELECTORS, 5)
        .unwrap_or_else(|| link_title.to_string());

    Some(Article {
        title: Some(title),
        url: url.to_string(),
        content: Some(content),
        summary: None,
        image_url: extract_image(&document, &base_url),
        author: Some(extract_author(&document)),
        published_at: Some(extract_date(&document)),
        source: SOURCE.to_string(),
    })
}

/// First element across the selector chain whose text exceeds `min_chars`.
fn first_text_over(document: &Html, selectors: &[&str], min_chars: usize) -> Option<String> {
    for css in selectors {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element_text(element);
            if text.chars().count() > min_chars {
                return Some(text);
            }
        }
    }
    None
}

/// First matching attribute value across the document.
fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr(attr))
        .map(str::to_string)
}

/// Substantial paragraphs joined together, skipping the first couple of
/// nav/teaser paragraphs when the page has many.
fn paragraph_fallback(document: &Html) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    let parts: Vec<String> = document
        .select(&selector)
        .map(element_text)
        .filter(|text| text.chars().count() > 30)
        .collect();
    let body = if parts.len() > 5 { &parts[2..] } else { &parts[..] };
    body.join(" ")
}

fn extract_image(document: &Html, base_url: &Url) -> Option<String> {
    if let Some(src) = first_attr(document, r#"meta[property="og:image"]"#, "content") {
        return Some(src);
    }
    if let Some(src) = first_attr(document, r#"meta[name="twitter:image"]"#, "content") {
        return Some(src);
    }
    for css in IMAGE_SELECTORS {
        if let Some(src) = first_attr(document, css, "src") {
            return Some(resolve_src(base_url, &src));
        }
    }
    None
}

fn extract_date(document: &Html) -> String {
    if let Some(date) = first_attr(document, r#"meta[property="article:published_time"]"#, "content")
    {
        return date;
    }
    if let Some(date) = first_attr(document, "time[datetime]", "datetime") {
        return date;
    }
    for &css in DATE_SELECTORS {
        if let Some(text) = first_text_over(document, &[css], 0) {
            return text;
        }
    }
    Local::now().format("%Y-%m-%d").to_string()
}

fn extract_author(document: &Html) -> String {
    if let Some(author) = first_attr(document, r#"meta[name="author"]"#, "content") {
        return author;
    }
    for &css in AUTHOR_SELECTORS {
        if let Some(text) = first_text_over(document, &[css], 0) {
            if text.chars().count() < 100 {
                return text;
            }
        }
    }
    SOURCE.to_string()
}
