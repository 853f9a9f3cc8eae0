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
    #[serde(rename = "bountyId")]
    bounty_id: String,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "bounty_applications".to_string(),
            description: "Applications humans have submitted to a bounty".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["bountyId"],
                "properties": {
                    "bountyId": {"type": "string", "description": "Identifier returned by `post_bounty` or `list_bounties`"}
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
    let applications = context
        .client
        .get_bounty_applications(&args.bounty_id)
        .await?;

    let mut lines = vec![
        markdown::header(1, "📨 Bounty Applications"),
        markdown::blank_line(),
        markdown::bold("Bounty", &args.bounty_id),
        markdown::bold("Applications", &applications.len().to_string()),
        markdown::blank_line(),
    ];

    if applications.is_empty() {
        lines.push("No one has applied yet.".to_string());
    } else {
        for application in &applications {
            let rate = application
                .rate
                .map_or_else(|| "bounty price".to_string(), |rate| format!("${rate}/hr"));
            lines.push(format!(
                "• **{}** ({}) — {} [{}]",
                application.human_name, application.human_id, rate, application.status
            ));
            if !application.message.is_empty() {
                lines.push(format!("  \"{}\"", application.message));
            }
            lines.push(format!("  application id: `{}`", application.id));
        }
    }

    let total = applications.len();
    Ok(text_response(lines).with_metadata(json!({ "total": total })))
}
