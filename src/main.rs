use anyhow::Context;
use clap::Parser;
use consensia::agent::session::{SearchSession, SessionState};
use consensia::agent::Agent;
use consensia::config::AppConfig;
use env_logger::Env;
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Find how different outlets covered a news event and compare their claims.
#[derive(Parser, Debug)]
#[command(name = "consensia", version)]
struct Cli {
    /// Search this topic directly instead of letting the agent extract it.
    #[arg(long)]
    topic: Option<String>,
    /// Date of the event (YYYY-MM-DD), used with --topic.
    #[arg(long)]
    date: Option<String>,
    /// An article, a summary or a question about a news event.
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse the specified (or default) .env file
    let dotenv_path = env::var("CONSENSIA_DOTENV_PATH").unwrap_or_else(|_| ".env".to_string());
    let dotenv_result = dotenvy::from_path(&dotenv_path);

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match dotenv_result {
        Ok(()) => log::info!("Loaded env from {}", dotenv_path),
        Err(err) => log::debug!("No .env loaded from {}: {}", dotenv_path, err),
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Reading configuration")?;
    let agent = Agent::new(config)?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let response = match cli.topic {
        Some(topic) => run_session(&agent, &mut stdin, &topic, cli.date.as_deref()).await?,
        None => {
            let text = if cli.text.is_empty() {
                ask(&mut stdin, "Paste an article or describe the news event:").await?
            } else {
                cli.text.join(" ")
            };
            agent.prompt(&text).await?
        }
    };

    println!("{}", response);
    Ok(())
}

async fn run_session(
    agent: &Agent,
    stdin: &mut Lines<BufReader<Stdin>>,
    topic: &str,
    date: Option<&str>,
) -> anyhow::Result<String> {
    let mut session = SearchSession::new();
    if let Err(err) = session.supply_topic(topic) {
        println!("{}", err);
    }
    if let Some(date) = date {
        if let Err(err) = session.supply_date(date) {
            println!("{}", err);
        }
    }

    while let Some(question) = session.next_question() {
        let answer = ask(stdin, question).await?;
        let outcome = if *session.state() == SessionState::AwaitingTopic {
            session.supply_topic(&answer)
        } else {
            session.supply_date(&answer)
        };
        if let Err(err) = outcome {
            println!("{}", err);
        }
    }

    match session.run(agent.news(), agent.engine()).await? {
        SessionState::ReportReady(report) => Ok(report.clone()),
        SessionState::ErrorReported(message) => Ok(message.clone()),
        other => anyhow::bail!("search ended in unexpected state {:?}", other),
    }
}

async fn ask(stdin: &mut Lines<BufReader<Stdin>>, question: &str) -> anyhow::Result<String> {
    println!("{}", question);
    stdin
        .next_line()
        .await
        .context("Reading from stdin")?
        .context("No input on stdin")
}
