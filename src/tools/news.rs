use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use std::convert::Infallible;

use crate::news::{NewsBackend, NewsSearch, SearchResult};

/// Exposes a news backend to the search agent. Failures are reported inside
/// the result so the agent can relay them.
#[derive(Debug, Clone)]
pub struct NewsTool<N = NewsBackend> {
    news: N,
}

#[derive(Deserialize, Debug)]
pub struct NewsArgs {
    /// Event date in YYYY-MM-DD format.
    #[serde(default)]
    pub date: Option<String>,
    /// Topic of at most three significant words.
    pub topic: String,
}

impl<N> NewsTool<N> {
    pub fn new(news: N) -> Self {
        Self { news }
    }
}

impl<N: NewsSearch + 'static> Tool for NewsTool<N> {
    const NAME: &'static str = "get_related_news";

    type Error = Infallible;
    type Args = NewsArgs;
    type Output = SearchResult;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search news coverage of a topic around a date. Returns either {\"status\": \"success\", \"stories\": [...], \"note\"?} or {\"status\": \"error\", \"error_message\"}."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "The event or subject to search for, at most three significant words."
                    },
                    "date": {
                        "type": "string",
                        "description": "Date of the event in YYYY-MM-DD format."
                    }
                },
                "required": ["topic", "date"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        log::info!(
            "searching related news for '{}' ({})...",
            args.topic,
            args.date.as_deref().unwrap_or("no date")
        );
        Ok(self.news.search_news(args.date.as_deref(), &args.topic).await)
    }
}
