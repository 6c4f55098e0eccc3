use consensia::news::newsapi::NewsApi;
use consensia::news::{NewsClient, NewsConfig, SearchResult, RELAXED_NOTE, WIDENED_NOTE};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client(server: &MockServer, api_key: Option<&str>) -> NewsClient<NewsApi> {
    NewsClient::new(
        NewsApi::new(api_key.map(str::to_string), server.uri()),
        &NewsConfig::default(),
    )
    .expect("Failed to create NewsAPI client")
}

fn article(title: &str, source: &str) -> serde_json::Value {
    serde_json::json!({
        "source": { "id": null, "name": source },
        "author": "Reporter",
        "title": title,
        "description": format!("{} description", title),
        "url": format!("https://example.com/{}", title.replace(' ', "-")),
        "urlToImage": null,
        "publishedAt": "2024-03-01T12:00:00Z",
        "content": format!("{} content… [+1200 chars]", title)
    })
}

fn articles(count: usize, prefix: &str) -> serde_json::Value {
    let items = (1..=count)
        .map(|i| article(&format!("{} {}", prefix, i), &format!("Outlet {}", i)))
        .collect::<Vec<_>>();
    serde_json::json!({ "status": "ok", "totalResults": count, "articles": items })
}

fn empty() -> serde_json::Value {
    serde_json::json!({ "status": "ok", "totalResults": 0, "articles": [] })
}

fn stories(result: SearchResult) -> (Vec<consensia::news::Story>, Option<String>) {
    match result {
        SearchResult::Success { stories, note } => (stories, note),
        SearchResult::Failure { error_message } => panic!("Unexpected failure: {error_message}"),
    }
}

fn failure(result: SearchResult) -> String {
    match result {
        SearchResult::Failure { error_message } => error_message,
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn returns_stories_inside_date_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "Boeing grounding"))
        .and(query_param("apiKey", API_KEY))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "relevancy"))
        .and(query_param("pageSize", "10"))
        .and(query_param("from", "2024-02-29"))
        .and(query_param("to", "2024-03-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(5, "Boeing")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("2024-03-01"), "Boeing grounding")
        .await;

    let (stories, note) = stories(result);
    assert_eq!(stories.len(), 5);
    assert_eq!(note, None);
    assert_eq!(stories[0].headline, "Boeing 1");
    assert_eq!(stories[0].source, "Outlet 1");
    assert_eq!(stories[0].url, "https://example.com/Boeing-1");
    assert_eq!(stories[0].published_at, "2024-03-01T12:00:00Z");
    assert_eq!(stories[0].image, None);
}

#[tokio::test]
async fn widens_search_when_date_window_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("from", "2024-02-29"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "rare eclipse event"))
        .and(query_param("sortBy", "relevancy"))
        .and(query_param_is_missing("from"))
        .and(query_param_is_missing("to"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(3, "Eclipse")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("2024-03-01"), "rare eclipse event")
        .await;

    let (stories, note) = stories(result);
    assert_eq!(stories.len(), 3);
    assert_eq!(note.as_deref(), Some(WIDENED_NOTE));
}

#[tokio::test]
async fn falls_back_to_popularity_sort() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("sortBy", "relevancy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("sortBy", "popularity"))
        .and(query_param_is_missing("from"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(2, "Popular")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY)).search(None, "solar flare").await;

    let (stories, note) = stories(result);
    assert_eq!(stories.len(), 2);
    assert_eq!(note.as_deref(), Some(RELAXED_NOTE));
}

#[tokio::test]
async fn reports_failure_after_every_fallback_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty()))
        .expect(3)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("2024-03-01"), "unheard of happening")
        .await;

    assert_eq!(
        failure(result),
        "No news articles found for topic 'unheard of happening' on or around 2024-03-01. Try using more specific keywords or a different date range."
    );
}

#[tokio::test]
async fn missing_credential_fails_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(1, "Never")))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server, None)
        .search(Some("2024-03-01"), "Boeing grounding")
        .await;

    let message = failure(result);
    assert!(message.contains("NewsAPI API key not found"));
    assert!(message.contains("CONSENSIA_NEWSAPI_API_KEY"));
}

#[tokio::test]
async fn blank_credential_counts_as_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(1, "Never")))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server, Some("  ")).search(None, "Boeing").await;

    assert!(failure(result).contains("API key not found"));
}

#[tokio::test]
async fn rate_limit_is_a_hard_error_without_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("2024-03-01"), "Boeing grounding")
        .await;

    assert_eq!(
        failure(result),
        "NewsAPI error: You have made too many requests recently."
    );
}

#[tokio::test]
async fn error_status_without_json_reports_http_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY)).search(None, "Boeing").await;

    assert_eq!(failure(result), "NewsAPI error: HTTP error 502");
}

#[tokio::test]
async fn malformed_date_searches_without_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param_is_missing("from"))
        .and(query_param_is_missing("to"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(2, "Undated")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("last Tuesday"), "Boeing grounding")
        .await;

    let (stories, note) = stories(result);
    assert_eq!(stories.len(), 2);
    assert_eq!(note, None);
}

#[tokio::test]
async fn out_of_range_date_searches_without_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param_is_missing("from"))
        .and(query_param_is_missing("to"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(1, "Undated")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("+262142-12-31"), "Boeing grounding")
        .await;

    let (stories, note) = stories(result);
    assert_eq!(stories.len(), 1);
    assert_eq!(note, None);
}

#[tokio::test]
async fn long_topics_are_reduced_to_keywords() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "grounding boeing 737 max fleet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(1, "Boeing")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(None, "The grounding of the Boeing 737 MAX fleet")
        .await;

    assert_eq!(stories(result).0.len(), 1);
}

#[tokio::test]
async fn drops_articles_without_title() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [
                { "source": { "name": "Wire" }, "title": "", "url": "https://a" },
                { "source": { "name": "Wire" }, "title": null, "url": "https://b" },
                {
                    "source": { "id": "x" },
                    "title": "Kept headline",
                    "description": null,
                    "content": null,
                    "url": "https://c",
                    "urlToImage": "https://c/image.jpg",
                    "publishedAt": "2024-03-01"
                }
            ]
        })))
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY)).search(None, "Kept").await;

    let (stories, _) = stories(result);
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].headline, "Kept headline");
    assert_eq!(stories[0].source, "Unknown source");
    assert_eq!(stories[0].description, "");
    assert_eq!(stories[0].image.as_deref(), Some("https://c/image.jpg"));
    assert!(stories.iter().all(|s| !s.headline.is_empty()));
}

#[tokio::test]
async fn error_status_in_ok_response_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "code": "parameterInvalid",
            "message": "The q parameter is invalid."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY)).search(None, "Boeing").await;

    assert_eq!(failure(result), "NewsAPI error: The q parameter is invalid.");
}

#[tokio::test]
async fn malformed_payload_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY))
        .search(Some("2024-03-01"), "Boeing")
        .await;

    assert!(failure(result).starts_with("Error fetching news: malformed response"));
}

#[tokio::test]
async fn timeout_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(articles(1, "Slow"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = NewsClient::new(
        NewsApi::new(Some(API_KEY.to_string()), server.uri()),
        &NewsConfig {
            timeout_secs: Some(1),
            ..NewsConfig::default()
        },
    )
    .expect("Failed to create NewsAPI client");

    let result = client.search(None, "Boeing").await;

    let message = failure(result);
    assert!(message.starts_with("Error fetching news"));
    assert!(message.contains("timed out"), "{}", message);
    assert!(!message.contains(API_KEY));
}

#[tokio::test]
async fn blank_topic_fails_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(1, "Never")))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server, Some(API_KEY)).search(Some("2024-03-01"), "   ").await;

    assert_eq!(failure(result), "A topic is required to search for news.");
}
