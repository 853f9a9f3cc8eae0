use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    limit: Option<i64>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "list_bounties".to_string(),
            description: "List open bounties on the platform".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Page size, clamped to 1..=500"}
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
    let bounties = context.client.list_bounties(args.limit.unwrap_or(20)).await?;

    let mut lines = vec![
        markdown::header(1, "🎯 Bounties"),
        markdown::blank_line(),
        markdown::bold("Total", &bounties.len().to_string()),
        markdown::blank_line(),
    ];

    if bounties.is_empty() {
        lines.push("No bounties are open right now.".to_string());
    } else {
        for bounty in &bounties {
            lines.push(format!(
                "• **{}** — ${} ({}) [{}] {} applicant(s)",
                bounty.title, bounty.price, bounty.price_type, bounty.status,
                bounty.application_count
            ));
            lines.push(format!("  id: `{}`", bounty.id));
        }
    }

    let total = bounties.len();
    Ok(text_response(lines).with_metadata(json!({ "total": total })))
}
