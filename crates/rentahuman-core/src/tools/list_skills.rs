use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{text_response, wrap_handler},
};

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "list_skills".to_string(),
            description: "All skills offered on the platform".to_string(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle(context).await }),
    )
}

async fn handle(context: Arc<AppContext>) -> Result<ToolResponse> {
    let skills = context.client.list_skills().await?;

    let mut lines = vec![
        markdown::header(1, "🛠 Platform Skills"),
        markdown::blank_line(),
        markdown::bold("Total", &skills.len().to_string()),
        markdown::blank_line(),
    ];

    if skills.is_empty() {
        lines.push("No skills are listed right now.".to_string());
    } else {
        for skill in &skills {
            match &skill.category {
                Some(category) => lines.push(format!("• {} ({category})", skill.name)),
                None => lines.push(format!("• {}", skill.name)),
            }
        }
    }

    let total = skills.len();
    Ok(text_response(lines).with_metadata(json!({ "total": total })))
}
