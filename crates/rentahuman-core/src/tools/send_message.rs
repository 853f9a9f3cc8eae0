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
    #[serde(rename = "conversationId")]
    conversation_id: String,
    message: String,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "send_message".to_string(),
            description: "Send a message in an existing conversation (requires an API key)"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["conversationId", "message"],
                "properties": {
                    "conversationId": {"type": "string"},
                    "message": {"type": "string"}
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
    let message = context
        .client
        .send_message(&args.conversation_id, &args.message)
        .await?;

    let lines = vec![
        markdown::header(1, "💬 Message Sent"),
        markdown::blank_line(),
        markdown::bold("Conversation", &args.conversation_id),
        markdown::bold("Message", &message.id),
    ];

    let id = message.id.clone();
    Ok(text_response(lines).with_metadata(json!({ "messageId": id })))
}
