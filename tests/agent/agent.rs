use consensia::agent::Agent;
use consensia::config::AppConfig;
use consensia::news::{NewsConfig, ProviderKind};

fn config(news: NewsConfig) -> AppConfig {
    AppConfig {
        gemini_api_key: "test-key".to_string(),
        gemini_model: "test-model".to_string(),
        compare_model: "test-compare-model".to_string(),
        news,
    }
}

#[tokio::test]
async fn agent_uses_gnews_by_default() {
    let agent = Agent::new(config(NewsConfig::default())).expect("Failed to build agent");
    assert_eq!(agent.news().name(), "GNews");
}

#[tokio::test]
async fn agent_uses_configured_provider() {
    let agent = Agent::new(config(NewsConfig {
        provider: ProviderKind::NewsApi,
        newsapi_api_key: Some("news-key".to_string()),
        ..NewsConfig::default()
    }))
    .expect("Failed to build agent");

    assert_eq!(agent.news().name(), "NewsAPI");
}

#[tokio::test]
async fn agent_new_fails_on_invalid_news_base_url() {
    let result = Agent::new(config(NewsConfig {
        provider: ProviderKind::GNews,
        gnews_base_url: Some("not a url".to_string()),
        ..NewsConfig::default()
    }));

    match result {
        Ok(_) => panic!("Expected Agent::new to fail"),
        Err(err) => assert!(err.to_string().contains("Invalid news API base URL")),
    }
}
