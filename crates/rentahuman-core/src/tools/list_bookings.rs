use std::sync::Arc;

use anyhow::Result;
use rentahuman_client::types::BookingFilter;
use serde::Deserialize;
use serde_json::json;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    #[serde(rename = "humanId")]
    human_id: Option<String>,
    #[serde(rename = "agentId")]
    agent_id: Option<String>,
    status: Option<String>,
    limit: Option<i64>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "list_bookings".to_string(),
            description: "List bookings, optionally filtered by human, agent, or status"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "humanId": {"type": "string"},
                    "agentId": {"type": "string"},
                    "status": {"type": "string", "description": "e.g. \"pending\" or \"confirmed\""},
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
    let filter = BookingFilter {
        human_id: args.human_id,
        agent_id: args.agent_id,
        status: args.status,
        limit: args.limit.unwrap_or(20),
    };
    let bookings = context.client.list_bookings(&filter).await?;

    let mut lines = vec![
        markdown::header(1, "📅 Bookings"),
        markdown::blank_line(),
        markdown::bold("Total", &bookings.len().to_string()),
        markdown::blank_line(),
    ];

    if bookings.is_empty() {
        lines.push("No bookings matched those filters.".to_string());
    } else {
        for booking in &bookings {
            lines.push(format!(
                "• **{}** — human {} ({}) [{}]",
                booking.task_title, booking.human_id, booking.id, booking.status
            ));
        }
    }

    let total = bookings.len();
    Ok(text_response(lines).with_metadata(json!({ "total": total })))
}
