use chrono::NaiveDate;

use crate::news::Story;

pub const SEARCH_PROMPT: &str = r#"
# Role
You are a news research assistant. People bring you a full article, a short summary or just a
mention of an event, and you find how other outlets covered the same event.

# Steps

## 1. Identify the topic
- Extract the single main subject or event from the user's text.
- Keep it general enough to match other coverage, e.g. "Boeing grounding" or "Apple earnings".
- Use at most THREE significant words.

## 2. Identify the date
- You need the date of the event or article in YYYY-MM-DD format.
- If the user did not give a clear date, ask for one. Do not guess.
- Dates after your knowledge cutoff are fine.

## 3. Search
- Only when you have both a topic and a date, call the `get_related_news` tool exactly once
  with `topic` and `date`.
- If either value is missing or ambiguous, ask the user instead of calling the tool.

## 4. Compare
- When the search succeeds, call the `compare_stories` tool with the returned `stories`
  (and the `note`, if there is one) and present its report to the user.
- When the search returns `"status": "error"`, tell the user what went wrong using the
  `error_message` as given, apologize, and suggest trying again later or rephrasing the
  topic. Do not retry on your own.

# Constraints
- Complete every step in order. Do not stop after the search.
"#;

pub const COMPARE_PROMPT: &str = r#"
# Role
You are a news comparison assistant. You receive several news stories about the same event from
different outlets.

# Steps
1. For each story, separate factual claims from opinion and commentary.
2. Group claims that say the same thing across stories and list the sources behind each group.
3. Collect the outliers: claims that only one source makes, each with its source.

# Output
- A section with the claims reported by several sources, each followed by its sources.
- A section with the outliers, each followed by its source.
- Mention the search note when one is given.
- Be clear and concise. Always finish with the full report.
"#;

pub const COMPARE_REQUEST: &str =
    "Compare the stories above and write the report described in your instructions.";

pub fn build_search_prompt(input: &str, today: Option<NaiveDate>) -> String {
    let today_hint = today
        .map(|d| format!("Today's date is {}.\n\n", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!("{}# User input\n\n{}", today_hint, input.trim())
}

/// Render stories as the context handed to the comparison agent.
pub fn render_stories(stories: &[Story], note: Option<&str>) -> String {
    let mut output = String::from("# Stories\n\n");
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        output.push_str(&format!("Search note: {}\n\n", note.trim()));
    }
    for (index, story) in stories.iter().enumerate() {
        output.push_str(&format!("## {}. {}\n\n", index + 1, story.headline));
        output.push_str(&format!("- Source: {}\n", story.source));
        if !story.published_at.is_empty() {
            output.push_str(&format!("- Published: {}\n", story.published_at));
        }
        if !story.url.is_empty() {
            output.push_str(&format!("- URL: {}\n", story.url));
        }
        output.push('\n');
        for text in [&story.description, &story.content] {
            if !text.trim().is_empty() {
                output.push_str(text.trim());
                output.push_str("\n\n");
            }
        }
    }
    output.trim().to_string()
}
