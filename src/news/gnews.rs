use serde::Deserialize;
use serde_json::Value;

use super::{base_url, NewsConfig, Provider, SearchError, SearchOptions, SearchRequest, Story};

const DEFAULT_BASE_URL: &str = "https://gnews.io";

/// GNews v4 search.
#[derive(Debug, Clone)]
pub struct GNews {
    api_key: Option<String>,
    base_url: String,
    expand_content: bool,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: Option<ArticleSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

impl GNews {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            expand_content: true,
        }
    }

    /// Request full article bodies instead of the truncated preview.
    pub fn with_expand_content(mut self, expand: bool) -> Self {
        self.expand_content = expand;
        self
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, SearchError> {
        Ok(Self::new(
            config.gnews_api_key.clone(),
            base_url(config.gnews_base_url.as_deref(), DEFAULT_BASE_URL)?,
        )
        .with_expand_content(config.gnews_expand_content.unwrap_or(true)))
    }
}

impl Provider for GNews {
    fn name(&self) -> &'static str {
        "GNews"
    }

    fn credential_variable(&self) -> &'static str {
        "CONSENSIA_GNEWS_API_KEY"
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v4/search", self.base_url)
    }

    fn query_params(
        &self,
        api_key: &str,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", request.query.clone()),
            ("token", api_key.to_string()),
            ("lang", options.language.clone()),
            ("max", options.page_size.to_string()),
            // No popularity ordering on GNews, only relevance or recency.
            ("sortby", "relevance".to_string()),
        ];
        if self.expand_content {
            params.push(("expand", "content".to_string()));
        }
        if let Some(window) = request.window {
            params.push(("from", window.from.format("%Y-%m-%dT00:00:00Z").to_string()));
            params.push(("to", window.to.format("%Y-%m-%dT23:59:59Z").to_string()));
        }
        params
    }

    fn parse_stories(&self, body: &str) -> Result<Vec<Story>, SearchError> {
        let response: SearchResponse = serde_json::from_str(body)?;
        Ok(response
            .articles
            .into_iter()
            .map(|article| Story {
                headline: article.title.unwrap_or_default(),
                source: article
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "Unknown source".to_string()),
                description: article.description.unwrap_or_default(),
                content: article.content.unwrap_or_default(),
                url: article.url.unwrap_or_default(),
                published_at: article.published_at.unwrap_or_default(),
                image: article.image.filter(|i| !i.is_empty()),
            })
            .collect())
    }

    fn error_message(&self, status: u16, body: &str) -> String {
        if body.contains("Daily limit") || body.contains("daily limit") {
            return "GNews API daily request limit exceeded. Please try again tomorrow.".to_string();
        }
        if body.contains("Invalid API key") || body.contains("apiKey is not valid") {
            return "Invalid GNews API key. Please check your API key configuration.".to_string();
        }
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| first_error(&value))
            .unwrap_or_else(|| format!("HTTP error {}", status));
        format!("GNews API error: {} (Status code: {})", message, status)
    }
}

/// GNews reports errors either as a list of strings or as an object keyed by
/// parameter name.
fn first_error(value: &Value) -> Option<String> {
    let first = match value.get("errors")? {
        Value::Array(items) => items.first()?,
        Value::Object(map) => map.values().next()?,
        other => other,
    };
    match first {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
