//! # ActuVerse News
//!
//! A news aggregation pipeline that scrapes articles from Congolese and
//! international news sites, deduplicates them against a remote store,
//! categorizes each one with keyword scoring, and posts the survivors to
//! the ActuVerse ingestion API.
//!
//! ## Usage
//!
//! ```sh
//! actuverse_news                       # scrape everything and post
//! actuverse_news --dry-run             # preview without posting
//! actuverse_news --sites radio_okapi   # a single source
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture, executed strictly
//! sequentially (one source at a time, no parallel fetches):
//! 1. **Scraping**: each registered site adapter produces normalized records
//! 2. **Deduplication**: in-batch URL dedup, then the recency window, then
//!    one existence check against the remote store
//! 3. **Categorization**: keyword scoring assigns each survivor a category
//! 4. **Delivery**: one POST per survivor to the ingestion API

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod categorizer;
mod cli;
mod dedupe;
mod models;
mod scrapers;
mod utils;

use api::ApiClient;
use categorizer::categorize;
use cli::Cli;
use models::Article;
use utils::build_http_client;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("actuverse_news starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(
        ?args.api_url,
        args.limit,
        args.hours_threshold,
        args.dry_run,
        "Parsed CLI arguments"
    );

    let client = build_http_client(&args.user_agent, args.request_timeout)?;
    let api = ApiClient::new(client.clone(), args.api_url.clone());

    // --- Select scrapers ---
    let selected: Vec<&str> = match &args.sites {
        Some(names) => {
            for name in names {
                if !scrapers::SOURCES.contains(&name.as_str()) {
                    warn!(source = %name, "Unknown source name; skipping");
                }
            }
            scrapers::SOURCES
                .iter()
                .copied()
                .filter(|source| names.iter().any(|name| name == source))
                .collect()
        }
        None => scrapers::SOURCES.to_vec(),
    };
    if selected.is_empty() {
        warn!("No matching scrapers selected; nothing to do");
        return Ok(());
    }

    // --- Scrape each source in turn ---
    // One failing source must never take the run down with it.
    let mut batch: Vec<Article> = Vec::new();
    for &name in &selected {
        info!(source = name, "Running scraper");
        match scrapers::run(name, &client, args.limit).await {
            Ok(articles) => {
                info!(source = name, count = articles.len(), "Scraper finished");
                batch.extend(articles);
            }
            Err(e) => {
                error!(source = name, error = %e, "Scraper failed; continuing with remaining sources");
            }
        }
    }

    let batch = dedupe::dedupe_by_url(batch);
    info!(count = batch.len(), "Total unique articles");

    if args.dry_run {
        print_preview(&batch, args.full_content);
        return Ok(());
    }

    // --- Filter and deliver ---
    let (articles, stats) =
        dedupe::filter_new_articles(batch, &api, !args.no_check_existing, args.hours_threshold)
            .await;
    dedupe::log_run_stats("all sources", &stats);

    let (delivered, failed) = api.save_articles(&articles).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        delivered,
        failed,
        "Execution complete"
    );

    Ok(())
}

/// Print the first records of a dry run to stdout, with the category each
/// would be delivered under.
fn print_preview(articles: &[Article], show_full_content: bool) {
    const PREVIEW_LIMIT: usize = 30;
    const CONTENT_PREVIEW_CHARS: usize = 500;

    for (i, article) in articles.iter().take(PREVIEW_LIMIT).enumerate() {
        let category = categorize(
            article.title.as_deref().unwrap_or(""),
            article.content.as_deref().unwrap_or(""),
            &article.source,
        );

        println!("--- {} ---", i + 1);
        println!("Title: {}", article.title.as_deref().unwrap_or("N/A"));
        println!("URL: {}", article.url);
        println!("Author: {}", article.author.as_deref().unwrap_or("N/A"));
        println!(
            "Published: {}",
            article.published_at.as_deref().unwrap_or("N/A")
        );
        println!("Image: {}", article.image_url.as_deref().unwrap_or("No image"));
        println!("Category: {category}");
        match article.content.as_deref().filter(|c| !c.is_empty()) {
            Some(content) => {
                let total = content.chars().count();
                println!("Content ({total} chars):");
                if show_full_content || total <= CONTENT_PREVIEW_CHARS {
                    println!("{content}");
                } else {
                    let head: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
                    println!("{head}...");
                    println!("[... {} more chars ...]", total - CONTENT_PREVIEW_CHARS);
                }
            }
            None => println!("Content: No content found"),
        }
        println!("Source: {}", article.source);
        println!();
    }

    if articles.len() > PREVIEW_LIMIT {
        println!(
            "[{} more articles not shown]",
            articles.len() - PREVIEW_LIMIT
        );
    }
}
