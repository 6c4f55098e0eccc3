use std::collections::BTreeSet;

use crate::news::keywords::is_stop_word;
use crate::news::Story;

/// Minimum Jaccard overlap for two claims to count as the same claim.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

const MIN_CLAIM_WORDS: usize = 3;
const DUPLICATE_THRESHOLD: f64 = 0.8;

const OPINION_MARKERS: &[&str] = &[
    "i think",
    "i believe",
    "we believe",
    "in my view",
    "in our view",
    "in my opinion",
    "opinion",
    "should",
    "ought to",
    "must",
    "arguably",
    "seems",
    "appears to",
    "perhaps",
    "probably",
    "clearly",
    "obviously",
    "unfortunately",
    "fortunately",
    "outrageous",
    "shameful",
    "disgraceful",
    "brilliant",
    "terrible",
];

// Extra filler words that carry no claim content.
const FILLER_WORDS: &[&str] = &[
    "that", "this", "these", "those", "it", "its", "as", "said", "says", "also", "than", "their",
    "they", "he", "she", "his", "her", "which", "who", "not", "new",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    Fact,
    Opinion,
}

/// A sentence taken from one story.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub text: String,
    pub source: String,
    pub kind: ClaimKind,
    words: BTreeSet<String>,
}

impl Claim {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if is_opinion(&text) {
            ClaimKind::Opinion
        } else {
            ClaimKind::Fact
        };
        let words = significant_words(&text);
        Self {
            text,
            source: source.into(),
            kind,
            words,
        }
    }

    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    pub fn similarity(&self, other: &Claim) -> f64 {
        jaccard(&self.words, &other.words)
    }
}

/// Claims that say roughly the same thing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimCluster {
    pub claims: Vec<Claim>,
}

impl ClaimCluster {
    /// Distinct sources in first-seen order.
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for claim in &self.claims {
            if !sources.contains(&claim.source) {
                sources.push(claim.source.clone());
            }
        }
        sources
    }

    pub fn representative(&self) -> &Claim {
        &self.claims[0]
    }

    fn best_similarity(&self, claim: &Claim) -> f64 {
        self.claims
            .iter()
            .map(|member| member.similarity(claim))
            .fold(0.0, f64::max)
    }
}

pub fn significant_words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= 3 || word.chars().all(|c| c.is_ascii_digit()))
        .filter(|word| !word.is_empty())
        .filter(|word| !is_stop_word(word) && !FILLER_WORDS.contains(&word.as_str()))
        .collect()
}

pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    let total = a.union(b).count();
    shared as f64 / total as f64
}

pub fn is_opinion(sentence: &str) -> bool {
    let trimmed = sentence.trim();
    if trimmed.ends_with('?') {
        return true;
    }
    let normalized = format!(
        " {} ",
        trimmed
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    );
    OPINION_MARKERS
        .iter()
        .any(|marker| normalized.contains(&format!(" {} ", marker)))
}

/// Remove the `... [+1234 chars]` tail that providers append to truncated
/// article bodies.
pub fn strip_truncation(text: &str) -> &str {
    match text.rfind("[+") {
        Some(idx) if text[idx..].trim_end().ends_with("chars]") => text[..idx]
            .trim_end()
            .trim_end_matches('…')
            .trim_end_matches("...")
            .trim_end(),
        _ => text,
    }
}

pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        current.push(ch);
        let at_boundary = matches!(ch, '.' | '!' | '?')
            && chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary || ch == '\n' {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// Headline plus every sentence of the description and content, skipping
/// fragments too short to state anything and repeats within the story.
pub fn extract_claims(story: &Story) -> Vec<Claim> {
    let mut claims: Vec<Claim> = Vec::new();
    let texts = [
        story.headline.as_str(),
        story.description.as_str(),
        strip_truncation(&story.content),
    ];
    for sentence in texts.iter().flat_map(|text| split_sentences(text)) {
        let claim = Claim::new(sentence, story.source.clone());
        if claim.words.len() < MIN_CLAIM_WORDS {
            continue;
        }
        if claims
            .iter()
            .any(|existing| existing.similarity(&claim) >= DUPLICATE_THRESHOLD)
        {
            continue;
        }
        claims.push(claim);
    }
    claims
}

/// Greedy single-link clustering in input order.
pub fn cluster(claims: &[Claim]) -> Vec<ClaimCluster> {
    let mut clusters: Vec<ClaimCluster> = Vec::new();
    for claim in claims {
        let best = clusters
            .iter_mut()
            .map(|cluster| {
                let score = cluster.best_similarity(claim);
                (cluster, score)
            })
            .filter(|(_, score)| *score >= SIMILARITY_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        match best {
            Some((cluster, _)) => cluster.claims.push(claim.clone()),
            None => clusters.push(ClaimCluster {
                claims: vec![claim.clone()],
            }),
        }
    }
    clusters
}
