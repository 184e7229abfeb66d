//! Command-line interface definitions for the ActuVerse scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every setting can also be provided through an environment variable, so a
//! cron deployment needs no flags at all.

use clap::Parser;

/// Command-line arguments for the ActuVerse news pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape every registered source and post to the local API
/// actuverse_news
///
/// # Preview what would be sent, with full article bodies
/// actuverse_news --dry-run --full-content
///
/// # Only two sources, larger recency window, no remote existence check
/// actuverse_news --sites radio_okapi mediacongo --hours-threshold 72 --no-check-existing
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Ingestion API endpoint for articles
    #[arg(
        long,
        env = "API_URL",
        default_value = "http://127.0.0.1:8001/api/articles"
    )]
    pub api_url: String,

    /// Print scraped articles instead of posting them to the API
    #[arg(long)]
    pub dry_run: bool,

    /// Show full article content in dry-run output
    #[arg(long)]
    pub full_content: bool,

    /// Run only the named scrapers (default: all registered)
    #[arg(long, num_args = 1..)]
    pub sites: Option<Vec<String>>,

    /// Maximum number of articles fetched per source
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Maximum article age in hours before it is dropped as old
    #[arg(long, env = "HOURS_THRESHOLD", default_value_t = 24)]
    pub hours_threshold: i64,

    /// Skip the remote existence check and treat every recent article as new
    #[arg(long)]
    pub no_check_existing: bool,

    /// User-Agent header sent with every request
    #[arg(
        long,
        env = "USER_AGENT",
        default_value = "ActuVerseScraper/1.0 (+https://actuverse.example)"
    )]
    pub user_agent: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 10)]
    pub request_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["actuverse_news"]);

        assert_eq!(cli.api_url, "http://127.0.0.1:8001/api/articles");
        assert_eq!(cli.limit, 10);
        assert_eq!(cli.hours_threshold, 24);
        assert_eq!(cli.request_timeout, 10);
        assert!(!cli.dry_run);
        assert!(!cli.full_content);
        assert!(!cli.no_check_existing);
        assert!(cli.sites.is_none());
    }

    #[test]
    fn test_cli_dry_run_with_sites() {
        let cli = Cli::parse_from([
            "actuverse_news",
            "--dry-run",
            "--full-content",
            "--sites",
            "bbc",
            "france24",
        ]);

        assert!(cli.dry_run);
        assert!(cli.full_content);
        assert_eq!(
            cli.sites,
            Some(vec!["bbc".to_string(), "france24".to_string()])
        );
    }

    #[test]
    fn test_cli_filter_flags() {
        let cli = Cli::parse_from([
            "actuverse_news",
            "--hours-threshold",
            "72",
            "--no-check-existing",
            "-l",
            "5",
        ]);

        assert_eq!(cli.hours_threshold, 72);
        assert_eq!(cli.limit, 5);
        assert!(cli.no_check_existing);
    }
}
