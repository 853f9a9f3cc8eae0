use std::sync::Arc;

use anyhow::Result;
use rentahuman_client::types::HumanSearch;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    markdown,
    state::{AppContext, SearchQueryLog, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    skill: Option<String>,
    #[serde(rename = "minRate")]
    min_rate: Option<f64>,
    #[serde(rename = "maxRate")]
    max_rate: Option<f64>,
    name: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "search_humans".to_string(),
            description: "Search for available humans, filtered by skill, hourly rate, or name"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "skill": {"type": "string", "description": "Skill name, e.g. \"Photography\""},
                    "minRate": {"type": "number", "description": "Minimum hourly rate in USD"},
                    "maxRate": {"type": "number", "description": "Maximum hourly rate in USD"},
                    "name": {"type": "string", "description": "Filter by name, case-insensitive"},
                    "limit": {"type": "integer", "description": "Page size, clamped to 1..=500"},
                    "offset": {"type": "integer", "description": "Pagination offset"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: Args = parse_args(value)?;
            handle(context, args).await
        }),
    )
}

async fn handle(context: Arc<AppContext>, args: Args) -> Result<ToolResponse> {
    let search = HumanSearch {
        skill: args.skill.clone(),
        min_rate: args.min_rate,
        max_rate: args.max_rate,
        name: args.name.clone(),
        limit: args.limit.unwrap_or(20),
        offset: args.offset.unwrap_or(0),
    };
    let humans = context.client.search_humans(&search).await?;

    context
        .record_search(SearchQueryLog {
            skill: args.skill,
            name: args.name,
            matches: humans.len(),
            timestamp: OffsetDateTime::now_utc(),
        })
        .await;

    let mut lines = vec![
        markdown::header(1, "🔍 Human Search Results"),
        markdown::blank_line(),
        markdown::bold("Matches", &humans.len().to_string()),
        markdown::blank_line(),
    ];

    if humans.is_empty() {
        lines.push("No humans matched those filters.".to_string());
        lines.push("Try a broader skill, a wider rate range, or `list_skills` to see what the platform offers.".to_string());
    } else {
        for human in &humans {
            lines.push(format!("• {}", human.summary()));
        }
    }

    let matches = humans.len();
    Ok(text_response(lines).with_metadata(json!({ "matches": matches })))
}
