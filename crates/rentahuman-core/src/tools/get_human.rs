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
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "get_human".to_string(),
            description: "Full profile for one human: bio, skills, availability, rating, wallets"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["humanId"],
                "properties": {
                    "humanId": {"type": "string", "description": "Identifier returned by `search_humans`"}
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
    let human = context.client.get_human(&args.human_id).await?;

    let mut lines = vec![
        markdown::header(1, &format!("👤 {}", human.name)),
        markdown::blank_line(),
        markdown::bold("Id", &human.id),
    ];
    if let Some(location) = &human.location {
        lines.push(markdown::bold("Location", location));
    }
    if let Some(rate) = human.rate {
        lines.push(markdown::bold("Rate", &format!("${rate}/hr")));
    }
    if let Some(rating) = human.rating {
        lines.push(markdown::bold("Rating", &format!("{rating:.1}")));
    }
    if let Some(completed) = human.completed_tasks {
        lines.push(markdown::bold("Completed tasks", &completed.to_string()));
    }
    if let Some(availability) = &human.availability {
        lines.push(markdown::bold("Availability", availability));
    }
    if !human.skills.is_empty() {
        lines.push(markdown::bold("Skills", &human.skills.join(", ")));
    }
    if let Some(bio) = &human.bio {
        lines.push(markdown::blank_line());
        lines.push(bio.clone());
    }
    if !human.crypto_wallets.is_empty() {
        lines.push(markdown::blank_line());
        lines.push(markdown::header(2, "Wallets"));
        for wallet in &human.crypto_wallets {
            lines.push(format!("• {}: `{}`", wallet.chain, wallet.address));
        }
    }

    let id = human.id.clone();
    Ok(text_response(lines).with_metadata(json!({ "humanId": id })))
}
