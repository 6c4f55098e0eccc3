pub mod prompt;
pub mod runner;
pub mod session;

use anyhow::Error;

use prompt::{build_search_prompt, COMPARE_PROMPT, SEARCH_PROMPT};
use runner::GeminiRunner;

use crate::compare::ComparisonEngine;
use crate::config::AppConfig;
use crate::news::NewsBackend;
use crate::tools::compare::CompareTool;
use crate::tools::news::NewsTool;

use rig::agent::Agent as RigAgent;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;
use rig::providers::gemini::completion::CompletionModel;

/// The search agent, wired to the news search and comparison tools.
pub struct Agent {
    agent: RigAgent<CompletionModel>,
    news: NewsBackend,
    engine: ComparisonEngine<GeminiRunner>,
}

impl Agent {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let news = NewsBackend::from_config(&config.news)?;
        let gemini_client = gemini::Client::new(&config.gemini_api_key)?;

        let engine = ComparisonEngine::new(GeminiRunner::new(
            &gemini_client,
            &config.compare_model,
            COMPARE_PROMPT,
        ));

        let agent = gemini_client
            .agent(&config.gemini_model)
            .preamble(SEARCH_PROMPT)
            .tool(NewsTool::new(news.clone()))
            .tool(CompareTool::new(engine.clone()))
            .build();

        Ok(Self {
            agent,
            news,
            engine,
        })
    }

    pub fn news(&self) -> &NewsBackend {
        &self.news
    }

    pub fn engine(&self) -> &ComparisonEngine<GeminiRunner> {
        &self.engine
    }

    pub async fn prompt(&self, input: &str) -> Result<String, Error> {
        let today = chrono::Local::now().date_naive();
        let prompt = build_search_prompt(input, Some(today));
        log::info!("sending prompt to model");
        self.agent
            .prompt(prompt)
            .multi_turn(10)
            .await
            .map_err(Error::from)
    }
}
