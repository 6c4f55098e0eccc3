use serde::Deserialize;

use super::{base_url, NewsConfig, Provider, SearchError, SearchOptions, SearchRequest, SortOrder, Story};

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// NewsAPI `everything` search.
#[derive(Debug, Clone)]
pub struct NewsApi {
    api_key: Option<String>,
    base_url: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    message: Option<String>,
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
    url_to_image: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

impl NewsApi {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, SearchError> {
        Ok(Self::new(
            config.newsapi_api_key.clone(),
            base_url(config.newsapi_base_url.as_deref(), DEFAULT_BASE_URL)?,
        ))
    }
}

impl Provider for NewsApi {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn credential_variable(&self) -> &'static str {
        "CONSENSIA_NEWSAPI_API_KEY"
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/everything", self.base_url)
    }

    fn supports_popularity(&self) -> bool {
        true
    }

    fn query_params(
        &self,
        api_key: &str,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Vec<(&'static str, String)> {
        let sort = match request.sort {
            SortOrder::Relevance => "relevancy",
            SortOrder::Popularity => "popularity",
        };
        let mut params = vec![
            ("q", request.query.clone()),
            ("apiKey", api_key.to_string()),
            ("language", options.language.clone()),
            ("sortBy", sort.to_string()),
            ("pageSize", options.page_size.to_string()),
        ];
        if let Some(window) = request.window {
            params.push(("from", window.from.format("%Y-%m-%d").to_string()));
            params.push(("to", window.to.format("%Y-%m-%d").to_string()));
        }
        params
    }

    fn parse_stories(&self, body: &str) -> Result<Vec<Story>, SearchError> {
        let response: EverythingResponse = serde_json::from_str(body)?;
        if response.status != "ok" {
            let message = response
                .message
                .unwrap_or_else(|| format!("unexpected status '{}'", response.status));
            return Err(SearchError::Provider(format!("NewsAPI error: {}", message)));
        }
        if response.total_results == 0 {
            return Ok(Vec::new());
        }

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
                image: article.url_to_image.filter(|i| !i.is_empty()),
            })
            .collect())
    }

    fn error_message(&self, status: u16, body: &str) -> String {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("HTTP error {}", status));
        format!("NewsAPI error: {}", message)
    }
}
