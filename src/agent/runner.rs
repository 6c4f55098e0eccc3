use std::future::Future;
use std::sync::Arc;

use rig::agent::Agent as RigAgent;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;
use rig::providers::gemini::completion::CompletionModel;

/// Runs a single LLM agent turn: `prompt` is the instruction, `context` the
/// material it works on.
pub trait AgentRunner: Send + Sync {
    fn run(
        &self,
        prompt: &str,
        context: &str,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Tool-less Gemini agent.
#[derive(Clone)]
pub struct GeminiRunner {
    agent: Arc<RigAgent<CompletionModel>>,
    model: String,
}

impl std::fmt::Debug for GeminiRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRunner")
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiRunner {
    pub fn new(client: &gemini::Client, model: &str, preamble: &str) -> Self {
        let agent = client.agent(model).preamble(preamble).build();
        Self {
            agent: Arc::new(agent),
            model: model.to_string(),
        }
    }
}

impl AgentRunner for GeminiRunner {
    async fn run(&self, prompt: &str, context: &str) -> anyhow::Result<String> {
        log::info!("sending comparison request to {}", self.model);
        let message = format!("{}\n\n{}", context, prompt);
        self.agent
            .prompt(message)
            .await
            .map_err(anyhow::Error::from)
    }
}
