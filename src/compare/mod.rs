pub mod claims;

use crate::agent::prompt::{render_stories, COMPARE_REQUEST};
use crate::agent::runner::AgentRunner;
use crate::news::Story;
use claims::{cluster, extract_claims, ClaimKind};

/// Outliers beyond this many are summarized by count only.
const MAX_OUTLIERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusClaim {
    pub claim: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlierClaim {
    pub claim: String,
    pub source: String,
}

/// Claims grouped by agreement across sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub consensus: Vec<ConsensusClaim>,
    pub outliers: Vec<OutlierClaim>,
    pub omitted_outliers: usize,
    pub opinions: usize,
    pub note: Option<String>,
}

impl Report {
    pub fn from_stories(stories: &[Story], note: Option<&str>) -> Self {
        let all_claims = stories.iter().flat_map(extract_claims).collect::<Vec<_>>();
        let opinions = all_claims
            .iter()
            .filter(|c| c.kind == ClaimKind::Opinion)
            .count();
        let facts = all_claims
            .into_iter()
            .filter(|c| c.kind == ClaimKind::Fact)
            .collect::<Vec<_>>();

        let mut consensus = Vec::new();
        let mut outliers = Vec::new();
        for group in cluster(&facts) {
            let sources = group.sources();
            if sources.len() >= 2 {
                consensus.push(ConsensusClaim {
                    claim: group.representative().text.clone(),
                    sources,
                });
            } else {
                let claim = group.representative();
                outliers.push(OutlierClaim {
                    claim: claim.text.clone(),
                    source: claim.source.clone(),
                });
            }
        }
        consensus.sort_by(|a, b| b.sources.len().cmp(&a.sources.len()));

        let omitted_outliers = outliers.len().saturating_sub(MAX_OUTLIERS);
        outliers.truncate(MAX_OUTLIERS);

        Self {
            consensus,
            outliers,
            omitted_outliers,
            opinions,
            note: note.map(str::to_string),
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        if let Some(note) = &self.note {
            output.push_str(&format!("_Note: {}_\n\n", note));
        }

        output.push_str("## Claims reported by several sources\n\n");
        if self.consensus.is_empty() {
            output.push_str("No claim was reported by more than one source.\n\n");
        }
        for item in &self.consensus {
            output.push_str(&format!("- {}\n", item.claim));
            output.push_str(&format!("  - Sources: {}\n", item.sources.join(", ")));
        }
        if !self.consensus.is_empty() {
            output.push('\n');
        }

        output.push_str("## Outliers\n\n");
        if self.outliers.is_empty() {
            output.push_str("No outlying claims.\n\n");
        }
        for item in &self.outliers {
            output.push_str(&format!("- {} (Source: {})\n", item.claim, item.source));
        }
        if self.omitted_outliers > 0 {
            output.push_str(&format!(
                "- ...and {} more single-source claims\n",
                self.omitted_outliers
            ));
        }
        if !self.outliers.is_empty() {
            output.push('\n');
        }

        if self.opinions > 0 {
            output.push_str(&format!(
                "{} opinion statement(s) were set aside.\n",
                self.opinions
            ));
        }

        output.trim().to_string()
    }
}

/// Compares stories with the comparison agent, falling back to a lexical
/// report whenever the agent fails or stays silent.
#[derive(Debug, Clone)]
pub struct ComparisonEngine<R> {
    runner: R,
}

impl<R: AgentRunner> ComparisonEngine<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn compare(&self, stories: &[Story], note: Option<&str>) -> String {
        if stories.is_empty() {
            return "No stories were provided to compare.".to_string();
        }

        log::info!("comparing {} stories", stories.len());
        let context = render_stories(stories, note);
        match self.runner.run(COMPARE_REQUEST, &context).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                log::warn!("comparison agent returned nothing, using lexical comparison");
                Report::from_stories(stories, note).render()
            }
            Err(err) => {
                log::warn!("comparison agent failed ({:#}), using lexical comparison", err);
                Report::from_stories(stories, note).render()
            }
        }
    }
}
