use chrono::NaiveDate;

use crate::agent::runner::AgentRunner;
use crate::compare::ComparisonEngine;
use crate::news::keywords::{is_stop_word, reduce};
use crate::news::window::{parse_date, InvalidDate};
use crate::news::{NewsSearch, SearchResult};

const MAX_TOPIC_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingTopic,
    AwaitingDate,
    Ready,
    Searching,
    ReportReady(String),
    ErrorReported(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No topic could be found in '{0}'")]
    MissingTopic(String),
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    #[error("A topic and a date are required before searching")]
    NotReady,
}

/// One user turn of the search orchestrator: collect a topic and a date,
/// search once, hand the stories to the comparison engine.
#[derive(Debug, Clone)]
pub struct SearchSession {
    state: SessionState,
    topic: Option<String>,
    date: Option<NaiveDate>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingTopic,
            topic: None,
            date: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Keep at most three significant words of `text` as the topic.
    pub fn supply_topic(&mut self, text: &str) -> Result<(), SessionError> {
        let topic = significant_topic(text);
        if topic.is_empty() {
            self.topic = None;
            self.advance();
            return Err(SessionError::MissingTopic(text.to_string()));
        }
        log::debug!("topic set to '{}'", topic);
        self.topic = Some(topic);
        self.advance();
        Ok(())
    }

    pub fn supply_date(&mut self, text: &str) -> Result<(), SessionError> {
        match parse_date(text) {
            Ok(date) => {
                self.date = Some(date);
                self.advance();
                Ok(())
            }
            Err(err) => {
                self.date = None;
                self.advance();
                Err(err.into())
            }
        }
    }

    /// The clarification to ask for, if any.
    pub fn next_question(&self) -> Option<&'static str> {
        match self.state {
            SessionState::AwaitingTopic => Some("Which news topic or event are you interested in?"),
            SessionState::AwaitingDate => {
                Some("On what date did it happen? Please use the YYYY-MM-DD format.")
            }
            _ => None,
        }
    }

    pub async fn run<N, R>(
        &mut self,
        news: &N,
        engine: &ComparisonEngine<R>,
    ) -> Result<&SessionState, SessionError>
    where
        N: NewsSearch,
        R: AgentRunner,
    {
        let (topic, date) = match (&self.state, &self.topic, self.date) {
            (SessionState::Ready, Some(topic), Some(date)) => (topic.clone(), date),
            _ => return Err(SessionError::NotReady),
        };

        self.state = SessionState::Searching;
        let date = date.format("%Y-%m-%d").to_string();
        log::info!("searching news for '{}' around {}", topic, date);

        self.state = match news.search_news(Some(&date), &topic).await {
            SearchResult::Success { stories, note } => {
                SessionState::ReportReady(engine.compare(&stories, note.as_deref()).await)
            }
            SearchResult::Failure { error_message } => {
                SessionState::ErrorReported(apology(&error_message))
            }
        };
        Ok(&self.state)
    }

    fn advance(&mut self) {
        self.state = match (&self.topic, &self.date) {
            (None, _) => SessionState::AwaitingTopic,
            (Some(_), None) => SessionState::AwaitingDate,
            (Some(_), Some(_)) => SessionState::Ready,
        };
    }
}

fn significant_topic(text: &str) -> String {
    reduce(text)
        .split_whitespace()
        .filter(|word| !is_stop_word(&word.to_lowercase()))
        .take(MAX_TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

fn apology(error_message: &str) -> String {
    format!(
        "Sorry, I couldn't find related news coverage. {} Please try again later or rephrase the topic.",
        error_message.trim()
    )
}
