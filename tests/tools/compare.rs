#[path = "../common/mod.rs"]
mod common;

use common::ScriptedRunner;
use consensia::compare::ComparisonEngine;
use consensia::tools::compare::{CompareArgs, CompareTool};
use rig::tool::Tool;

#[tokio::test]
async fn accepts_stories_as_returned_by_news_search() {
    let tool = CompareTool::new(ComparisonEngine::new(ScriptedRunner::answering("The report")));

    let args: CompareArgs = serde_json::from_value(serde_json::json!({
        "stories": [
            {
                "headline": "FAA grounds Boeing jets",
                "source": "Reuters",
                "description": "Regulators acted.",
                "content": "Body",
                "url": "https://reuters.example/1",
                "published_at": "2024-03-01T10:00:00Z",
                "image": "https://reuters.example/1.jpg"
            },
            { "headline": "Boeing jets grounded", "source": "AP" }
        ],
        "note": "Results found by expanding the search beyond the specified date."
    }))
    .expect("Failed to parse compare args");
    assert_eq!(args.stories.len(), 2);
    assert_eq!(args.stories[1].description, "");

    let output = tool.call(args).await.expect("Compare tool call failed");

    assert_eq!(output.report, "The report");
}

#[tokio::test]
async fn definition_requires_stories() {
    let tool = CompareTool::new(ComparisonEngine::new(ScriptedRunner::answering("unused")));

    let definition = tool.definition(String::new()).await;

    assert_eq!(definition.name, "compare_stories");
    assert_eq!(definition.parameters["required"], serde_json::json!(["stories"]));
}
