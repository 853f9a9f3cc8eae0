use std::sync::Arc;

use anyhow::Result;
use rentahuman_client::types::BookingCreate;
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
    human_id: String,
    #[serde(rename = "taskTitle")]
    task_title: String,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "estimatedHours")]
    estimated_hours: f64,
    description: Option<String>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "create_booking".to_string(),
            description: "Book a specific human for a task (requires an API key)".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["humanId", "taskTitle", "startTime", "estimatedHours"],
                "properties": {
                    "humanId": {"type": "string"},
                    "taskTitle": {"type": "string"},
                    "startTime": {"type": "string", "description": "ISO 8601 start time"},
                    "estimatedHours": {"type": "number"},
                    "description": {"type": "string"}
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
    let mut booking = BookingCreate::new(
        args.human_id,
        args.task_title,
        args.start_time,
        args.estimated_hours,
    );
    if let Some(description) = args.description {
        booking = booking.with_description(description);
    }

    let created = context.client.create_booking(&booking).await?;

    let lines = vec![
        markdown::header(1, "📅 Booking Created"),
        markdown::blank_line(),
        markdown::bold("Booking", &created.id),
        markdown::bold("Human", &created.human_id),
        markdown::bold("Task", &created.task_title),
        markdown::bold("Status", &created.status),
    ];

    let id = created.id.clone();
    let status = created.status.clone();
    Ok(text_response(lines).with_metadata(json!({ "bookingId": id, "status": status })))
}
