pub mod gnews;
pub mod keywords;
pub mod newsapi;
pub mod window;

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error as _;
use std::future::Future;
use std::time::Duration;

use gnews::GNews;
use newsapi::NewsApi;
use window::DateWindow;

pub const WIDENED_NOTE: &str = "Results found by expanding the search beyond the specified date.";
pub const RELAXED_NOTE: &str =
    "Results found by relaxing the search criteria: no date filter, sorted by popularity instead of relevance.";

/// One news article, normalized across providers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub headline: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Outcome of a news search as handed to the agents.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchResult {
    Success {
        stories: Vec<Story>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    #[serde(rename = "error")]
    Failure { error_message: String },
}

impl SearchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchResult::Success { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{provider} API key not found in configuration. Please set the {variable} environment variable.")]
    MissingCredential {
        provider: &'static str,
        variable: &'static str,
    },
    #[error("A topic is required to search for news.")]
    EmptyTopic,
    #[error(
        "No news articles found for topic '{}'{}. Try using more specific keywords or a different date range.",
        .topic,
        on_or_around(.date)
    )]
    NoResults { topic: String, date: Option<String> },
    #[error("{0}")]
    Provider(String),
    #[error("Error fetching news: {}", describe_transport(.0))]
    Transport(reqwest::Error),
    #[error("Error fetching news: malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// reqwest keeps the timeout or connection cause in the source chain.
fn describe_transport(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(": request timed out");
    }
    message
}

fn on_or_around(date: &Option<String>) -> String {
    date.as_deref()
        .map(|d| format!(" on or around {}", d))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Relevance,
    Popularity,
}

/// Provider-neutral description of a single search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub window: Option<DateWindow>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub language: String,
    pub page_size: u32,
}

/// Everything that differs between news APIs: where to send the request,
/// how to spell its parameters and how to read the answer.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    /// Environment variable that carries the credential, for error messages.
    fn credential_variable(&self) -> &'static str;
    fn api_key(&self) -> Option<&str>;
    fn endpoint(&self) -> String;
    fn supports_popularity(&self) -> bool {
        false
    }
    fn query_params(
        &self,
        api_key: &str,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Vec<(&'static str, String)>;
    /// Parse a successful response body. Returned stories may still carry
    /// empty headlines; the client drops those.
    fn parse_stories(&self, body: &str) -> Result<Vec<Story>, SearchError>;
    fn error_message(&self, status: u16, body: &str) -> String;
}

/// Search capability shared by every news backend.
pub trait NewsSearch: Send + Sync {
    fn search_news(
        &self,
        date: Option<&str>,
        topic: &str,
    ) -> impl Future<Output = SearchResult> + Send;
}

#[derive(Debug, Clone)]
pub struct NewsClient<P> {
    provider: P,
    options: SearchOptions,
    client: reqwest::Client,
}

impl<P: Provider> NewsClient<P> {
    pub fn new(provider: P, config: &NewsConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(10)))
            .user_agent("consensia/0.1")
            .build()
            .context("Failed to build news HTTP client")?;
        Ok(Self {
            provider,
            options: SearchOptions {
                language: config.language.clone().unwrap_or_else(|| "en".to_string()),
                page_size: config.page_size.unwrap_or(10),
            },
            client,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search for stories about `topic` near `date`. Never fails: every error
    /// is folded into [`SearchResult::Failure`].
    pub async fn search(&self, date: Option<&str>, topic: &str) -> SearchResult {
        match self.try_search(date, topic).await {
            Ok((stories, note)) => {
                log::info!(
                    "{} returned {} stories for '{}'",
                    self.provider.name(),
                    stories.len(),
                    topic
                );
                SearchResult::Success { stories, note }
            }
            Err(err) => {
                log::warn!("{} search failed: {}", self.provider.name(), err);
                SearchResult::Failure {
                    error_message: err.to_string(),
                }
            }
        }
    }

    async fn try_search(
        &self,
        date: Option<&str>,
        topic: &str,
    ) -> Result<(Vec<Story>, Option<String>), SearchError> {
        let api_key = self
            .provider
            .api_key()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SearchError::MissingCredential {
                provider: self.provider.name(),
                variable: self.provider.credential_variable(),
            })?;

        if topic.trim().is_empty() {
            return Err(SearchError::EmptyTopic);
        }

        let date = date.map(str::trim).filter(|d| !d.is_empty());
        let window = date.and_then(|d| match DateWindow::parse(d) {
            Ok(window) => Some(window),
            Err(err) => {
                log::warn!("{}; continuing without date filter", err);
                None
            }
        });

        let mut request = SearchRequest {
            query: keywords::reduce(topic),
            window,
            sort: SortOrder::Relevance,
        };

        let stories = self.fetch(api_key, &request).await?;
        if !stories.is_empty() {
            return Ok((stories, None));
        }

        if request.window.take().is_some() {
            log::info!("no results inside the date window, retrying without it");
            let stories = self.fetch(api_key, &request).await?;
            if !stories.is_empty() {
                return Ok((stories, Some(WIDENED_NOTE.to_string())));
            }
        }

        if self.provider.supports_popularity() {
            log::info!("no results by relevance, retrying sorted by popularity");
            request.sort = SortOrder::Popularity;
            let stories = self.fetch(api_key, &request).await?;
            if !stories.is_empty() {
                return Ok((stories, Some(RELAXED_NOTE.to_string())));
            }
        }

        Err(SearchError::NoResults {
            topic: topic.to_string(),
            date: date.map(str::to_string),
        })
    }

    async fn fetch(&self, api_key: &str, request: &SearchRequest) -> Result<Vec<Story>, SearchError> {
        log::debug!(
            "querying {} for '{}' (window: {:?}, sort: {:?})",
            self.provider.name(),
            request.query,
            request.window,
            request.sort
        );
        let params = self.provider.query_params(api_key, request, &self.options);
        let response = self
            .client
            .get(self.provider.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(|err| SearchError::Transport(err.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SearchError::Transport(err.without_url()))?;
        if !status.is_success() {
            return Err(SearchError::Provider(
                self.provider.error_message(status.as_u16(), &body),
            ));
        }

        let stories = self
            .provider
            .parse_stories(&body)?
            .into_iter()
            .filter(|story| !story.headline.trim().is_empty())
            .collect();
        Ok(stories)
    }
}

impl<P: Provider> NewsSearch for NewsClient<P> {
    async fn search_news(&self, date: Option<&str>, topic: &str) -> SearchResult {
        self.search(date, topic).await
    }
}

fn deserialize_option_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        s.parse::<u32>().map(Some).map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

fn deserialize_option_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        s.parse::<u64>().map(Some).map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

fn deserialize_option_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        s.trim()
            .to_ascii_lowercase()
            .parse::<bool>()
            .map(Some)
            .map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    NewsApi,
    #[default]
    GNews,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewsConfig {
    #[serde(rename = "news_provider", default)]
    pub provider: ProviderKind,
    pub newsapi_api_key: Option<String>,
    pub gnews_api_key: Option<String>,
    #[serde(rename = "news_language")]
    pub language: Option<String>,
    #[serde(
        rename = "news_page_size",
        default,
        deserialize_with = "deserialize_option_u32"
    )]
    pub page_size: Option<u32>,
    #[serde(
        rename = "news_timeout_secs",
        default,
        deserialize_with = "deserialize_option_u64"
    )]
    pub timeout_secs: Option<u64>,
    pub newsapi_base_url: Option<String>,
    pub gnews_base_url: Option<String>,
    #[serde(
        rename = "gnews_expand_content",
        default,
        deserialize_with = "deserialize_option_bool"
    )]
    pub gnews_expand_content: Option<bool>,
}

/// The news client selected by configuration.
#[derive(Debug, Clone)]
pub enum NewsBackend {
    NewsApi(NewsClient<NewsApi>),
    GNews(NewsClient<GNews>),
}

impl NewsBackend {
    pub fn from_config(config: &NewsConfig) -> Result<Self, SearchError> {
        let backend = match config.provider {
            ProviderKind::NewsApi => {
                NewsBackend::NewsApi(NewsClient::new(NewsApi::from_config(config)?, config)?)
            }
            ProviderKind::GNews => {
                NewsBackend::GNews(NewsClient::new(GNews::from_config(config)?, config)?)
            }
        };
        log::debug!("using {} for news search", backend.name());
        Ok(backend)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NewsBackend::NewsApi(client) => client.provider().name(),
            NewsBackend::GNews(client) => client.provider().name(),
        }
    }
}

impl NewsSearch for NewsBackend {
    async fn search_news(&self, date: Option<&str>, topic: &str) -> SearchResult {
        match self {
            NewsBackend::NewsApi(client) => client.search(date, topic).await,
            NewsBackend::GNews(client) => client.search(date, topic).await,
        }
    }
}

/// Validate and normalize a provider base URL.
pub(crate) fn base_url(value: Option<&str>, default: &str) -> Result<String, SearchError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default);
    let parsed = url::Url::parse(raw).with_context(|| format!("Invalid news API base URL: {}", raw))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
