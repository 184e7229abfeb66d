//! Ingestion API interaction: existence checking and article delivery.
//!
//! [`ApiClient`] wraps the shared HTTP client with the two calls this
//! pipeline makes against the downstream store:
//!
//! - **Existence check**: one POST carrying every candidate URL, answered
//!   with an `existing`/`new` partition. Any failure -- bad status,
//!   transport error, malformed body -- degrades to "everything is new" so
//!   the pipeline keeps moving.
//! - **Delivery**: one POST per surviving article, annotated with its
//!   derived category. Rejected or failed posts are logged and skipped,
//!   never retried within a run.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::categorizer::categorize;
use crate::models::Article;
use crate::utils::truncate_for_log;

/// Pause between two delivery posts, so a run never floods the API.
const DELIVERY_PAUSE: Duration = Duration::from_millis(200);

/// Client for the ActuVerse ingestion API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
}

/// Partition of candidate URLs as reported by the existence check.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckResult {
    /// URLs the store already knows.
    #[serde(default)]
    pub existing: Vec<String>,
    /// URLs safe to deliver.
    #[serde(default)]
    pub new: Vec<String>,
}

/// Request body for the existence check.
#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    urls: &'a [String],
}

/// Outgoing article payload. Field names match what the backend expects;
/// absent fields are omitted rather than sent as null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticlePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    category: &'a str,
}

impl<'a> ArticlePayload<'a> {
    fn new(article: &'a Article, category: &'a str) -> Self {
        Self {
            title: article.title.as_deref(),
            url: &article.url,
            content: article.content.as_deref(),
            image: article.image_url.as_deref(),
            source: &article.source,
            published_at: article.published_at.as_deref(),
            author: article.author.as_deref(),
            category,
        }
    }
}

impl ApiClient {
    /// Wrap the shared HTTP client with the ingestion endpoint.
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// The existence-check endpoint, derived from the ingestion URL.
    fn check_url(&self) -> String {
        self.api_url.replace("/articles", "/articles/check")
    }

    /// Ask the store which of `urls` it already knows.
    ///
    /// An empty input short-circuits without a network call. Every failure
    /// mode resolves to "all new": a blocked check must never block the
    /// pipeline.
    pub async fn check_existing(&self, urls: &[String]) -> CheckResult {
        if urls.is_empty() {
            return CheckResult::default();
        }

        let all_new = || CheckResult {
            existing: Vec::new(),
            new: urls.to_vec(),
        };

        let check_url = self.check_url();
        debug!(url = %check_url, count = urls.len(), "Checking existing articles");
        match self
            .client
            .post(&check_url)
            .json(&CheckRequest { urls })
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                match response.json::<CheckResult>().await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(error = %e, "Unreadable existence-check response; treating all as new");
                        all_new()
                    }
                }
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    "Existence check failed; treating all as new"
                );
                all_new()
            }
            Err(e) => {
                error!(error = %e, "Error checking existing articles; treating all as new");
                all_new()
            }
        }
    }

    /// Post one article, annotated with its category, to the ingestion
    /// endpoint. Returns whether the store accepted it.
    pub async fn deliver(&self, article: &Article, category: &str) -> bool {
        let payload = ArticlePayload::new(article, category);
        let title = article.title.as_deref().unwrap_or("(sans titre)");
        debug!(title = %truncate_for_log(title, 60), category, "Sending article");

        match self.client.post(&self.api_url).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                if status == StatusCode::OK || status == StatusCode::CREATED {
                    info!(title = %truncate_for_log(title, 60), category, "Saved article");
                    true
                } else {
                    let body = response.text().await.unwrap_or_default();
                    warn!(
                        status = status.as_u16(),
                        body = %truncate_for_log(&body, 300),
                        url = %article.url,
                        "Ingestion API rejected article"
                    );
                    false
                }
            }
            Err(e) => {
                error!(error = %e, url = %article.url, "Error posting article");
                false
            }
        }
    }

    /// Deliver every article in `articles`, categorizing each at send time.
    /// Returns `(delivered, failed)` counts.
    pub async fn save_articles(&self, articles: &[Article]) -> (usize, usize) {
        if articles.is_empty() {
            info!("No articles to save");
            return (0, 0);
        }

        let t0 = Instant::now();
        info!(
            count = articles.len(),
            api_url = %self.api_url,
            "Sending articles to ingestion API"
        );

        let mut delivered = 0;
        let mut failed = 0;
        for article in articles {
            let category = categorize(
                article.title.as_deref().unwrap_or(""),
                article.content.as_deref().unwrap_or(""),
                &article.source,
            );
            if self.deliver(article, category).await {
                delivered += 1;
            } else {
                failed += 1;
            }
            sleep(DELIVERY_PAUSE).await;
        }

        info!(
            delivered,
            failed,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Delivery finished"
        );
        (delivered, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_article() -> Article {
        Article {
            title: Some("Le président en visite à Goma".to_string()),
            url: "https://example.cd/2025/03/14/actualite/visite".to_string(),
            content: Some("Le chef de l'État est arrivé à Goma.".to_string()),
            summary: None,
            image_url: None,
            author: Some("Radio Okapi".to_string()),
            published_at: Some("14/03/2025".to_string()),
            source: "Radio Okapi".to_string(),
        }
    }

    fn api_for(server_uri: &str) -> ApiClient {
        ApiClient::new(
            reqwest::Client::new(),
            format!("{server_uri}/api/articles"),
        )
    }

    #[test]
    fn test_check_url_derivation() {
        let api = ApiClient::new(reqwest::Client::new(), "http://host:8001/api/articles");
        assert_eq!(api.check_url(), "http://host:8001/api/articles/check");
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let mut article = sample_article();
        article.image_url = None;
        article.published_at = None;
        article.author = None;

        let payload = ArticlePayload::new(&article, "politique");
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("title"));
        assert!(object.contains_key("url"));
        assert!(object.contains_key("source"));
        assert_eq!(object["category"], "politique");
        assert!(!object.contains_key("image"));
        assert!(!object.contains_key("publishedAt"));
        assert!(!object.contains_key("author"));
    }

    #[test]
    fn test_payload_uses_backend_field_names() {
        let mut article = sample_article();
        article.image_url = Some("https://example.cd/img.jpg".to_string());

        let payload = ArticlePayload::new(&article, "sécurité");
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["image"], "https://example.cd/img.jpg");
        assert_eq!(value["publishedAt"], "14/03/2025");
        assert_eq!(value["author"], "Radio Okapi");
    }

    #[tokio::test]
    async fn test_check_existing_empty_input_makes_no_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = api_for(&server.uri()).check_existing(&[]).await;
        assert_eq!(result, CheckResult::default());
    }

    #[tokio::test]
    async fn test_check_existing_honors_partition() {
        let server = MockServer::start().await;
        let urls = vec![
            "https://example.cd/a".to_string(),
            "https://example.cd/b".to_string(),
            "https://example.cd/c".to_string(),
        ];
        Mock::given(method("POST"))
            .and(path("/api/articles/check"))
            .and(body_json(serde_json::json!({ "urls": urls })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "existing": ["https://example.cd/a"],
                "new": ["https://example.cd/b", "https://example.cd/c"],
            })))
            .mount(&server)
            .await;

        let result = api_for(&server.uri()).check_existing(&urls).await;
        assert_eq!(result.existing, vec!["https://example.cd/a"]);
        assert_eq!(result.new.len(), 2);
    }

    #[tokio::test]
    async fn test_check_existing_missing_keys_default_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let urls = vec!["https://example.cd/a".to_string()];
        let result = api_for(&server.uri()).check_existing(&urls).await;
        assert!(result.existing.is_empty());
        assert!(result.new.is_empty());
    }

    #[tokio::test]
    async fn test_check_existing_bad_status_treats_all_as_new() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let urls = vec![
            "https://example.cd/a".to_string(),
            "https://example.cd/b".to_string(),
        ];
        let result = api_for(&server.uri()).check_existing(&urls).await;
        assert!(result.existing.is_empty());
        assert_eq!(result.new, urls);
    }

    #[tokio::test]
    async fn test_check_existing_transport_failure_treats_all_as_new() {
        // Nothing listens on port 1.
        let api = ApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1/articles");
        let urls = vec!["https://example.cd/a".to_string()];
        let result = api.check_existing(&urls).await;
        assert!(result.existing.is_empty());
        assert_eq!(result.new, urls);
    }

    #[tokio::test]
    async fn test_deliver_accepts_created_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        assert!(
            api_for(&server.uri())
                .deliver(&sample_article(), "politique")
                .await
        );
    }

    #[tokio::test]
    async fn test_deliver_skips_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("champ manquant"))
            .mount(&server)
            .await;

        assert!(
            !api_for(&server.uri())
                .deliver(&sample_article(), "politique")
                .await
        );
    }

    #[tokio::test]
    async fn test_save_articles_counts_outcomes_and_derives_category() {
        use wiremock::matchers::body_partial_json;

        let server = MockServer::start().await;
        // The sample article's title and content score on "politique" and
        // the Radio Okapi bonus keeps it there.
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .and(body_partial_json(
                serde_json::json!({ "category": "politique" }),
            ))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let articles = vec![sample_article(), sample_article()];
        let (delivered, failed) = api_for(&server.uri()).save_articles(&articles).await;
        assert_eq!(delivered, 2);
        assert_eq!(failed, 0);
    }
}
