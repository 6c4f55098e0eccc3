/// Topics with at most this many words are assumed to be reduced already.
const MAX_REDUCED_WORDS: usize = 3;

const STOP_WORDS: &[&str] = &[
    // articles
    "a", "an", "the", //
    // conjunctions
    "and", "or", "but", "nor", "so", "yet", //
    // prepositions
    "in", "on", "at", "to", "for", "with", "by", "about", "like", "from", "of", "into", "over",
    "after", "before", //
    // auxiliary verbs
    "is", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do", "does", "did",
    "will", "would", "can", "could", "get", "gets", "got",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Reduce a free-text topic to a compact search query.
///
/// Short topics are returned untouched. Longer ones are lower-cased and
/// stripped of stop words; if nothing survives the filter the original topic
/// is returned instead of an empty query.
pub fn reduce(topic: &str) -> String {
    if topic.split_whitespace().count() <= MAX_REDUCED_WORDS {
        return topic.to_string();
    }

    let lowered = topic.to_lowercase();
    let keywords = lowered
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .collect::<Vec<_>>();

    if keywords.is_empty() {
        topic.to_string()
    } else {
        keywords.join(" ")
    }
}
