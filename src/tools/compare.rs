use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::agent::runner::{AgentRunner, GeminiRunner};
use crate::compare::ComparisonEngine;
use crate::news::Story;

#[derive(Debug, Clone)]
pub struct CompareTool<R = GeminiRunner> {
    engine: ComparisonEngine<R>,
}

#[derive(Deserialize, Debug)]
pub struct CompareArgs {
    pub stories: Vec<Story>,
    /// Advisory note returned by the news search.
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CompareOutput {
    pub report: String,
}

impl<R> CompareTool<R> {
    pub fn new(engine: ComparisonEngine<R>) -> Self {
        Self { engine }
    }
}

impl<R: AgentRunner + 'static> Tool for CompareTool<R> {
    const NAME: &'static str = "compare_stories";

    type Error = Infallible;
    type Args = CompareArgs;
    type Output = CompareOutput;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Compare related news stories: group the claims they share, list outliers and their sources, and return a Markdown report."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "stories": {
                        "type": "array",
                        "description": "Stories exactly as returned by get_related_news.",
                        "items": {
                            "type": "object",
                            "properties": {
                                "headline": { "type": "string" },
                                "source": { "type": "string" },
                                "description": { "type": "string" },
                                "content": { "type": "string" },
                                "url": { "type": "string" },
                                "published_at": { "type": "string" }
                            },
                            "required": ["headline", "source"]
                        }
                    },
                    "note": {
                        "type": "string",
                        "description": "Optional note returned by get_related_news."
                    }
                },
                "required": ["stories"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let report = self.engine.compare(&args.stories, args.note.as_deref()).await;
        Ok(CompareOutput { report })
    }
}
