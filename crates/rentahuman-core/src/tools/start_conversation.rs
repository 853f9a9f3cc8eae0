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
    #[serde(rename = "humanId")]
    human_id: String,
    subject: String,
    message: String,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "start_conversation".to_string(),
            description: "Open a conversation with a human (requires an API key)".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["humanId", "subject", "message"],
                "properties": {
                    "humanId": {"type": "string"},
                    "subject": {"type": "string"},
                    "message": {"type": "string", "description": "The opening message"}
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
    let conversation = context
        .client
        .start_conversation(&args.human_id, &args.subject, &args.message)
        .await?;

    let lines = vec![
        markdown::header(1, "💬 Conversation Started"),
        markdown::blank_line(),
        markdown::bold("Conversation", &conversation.id),
        markdown::bold("Human", &conversation.human_id),
        markdown::bold("Subject", &conversation.subject),
        markdown::blank_line(),
        "Use `send_message` with this conversation id to continue.".to_string(),
    ];

    let id = conversation.id.clone();
    Ok(text_response(lines).with_metadata(json!({ "conversationId": id })))
}
