use std::sync::Arc;

use anyhow::Result;
use rentahuman_client::types::BountyCreate;
use serde::Deserialize;
use serde_json::json;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    title: String,
    description: String,
    price: f64,
    #[serde(rename = "priceType")]
    price_type: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(rename = "estimatedHours")]
    estimated_hours: Option<f64>,
    location: Option<String>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "post_bounty".to_string(),
            description: "Post a task bounty for humans to apply to (requires an API key)"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "required": ["title", "description", "price"],
                "properties": {
                    "title": {"type": "string"},
                    "description": {"type": "string"},
                    "price": {"type": "number", "description": "Price in USD"},
                    "priceType": {"type": "string", "enum": ["fixed", "hourly"]},
                    "skills": {"type": "array", "items": {"type": "string"}},
                    "estimatedHours": {"type": "number"},
                    "location": {"type": "string"}
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
    let mut bounty = BountyCreate::new(args.title, args.description, args.price);
    if let Some(price_type) = args.price_type {
        bounty.price_type = price_type;
    }
    bounty.skills = args.skills;
    bounty.estimated_hours = args.estimated_hours;
    bounty.location = args.location;

    let created = context.client.create_bounty(&bounty).await?;

    let lines = vec![
        markdown::header(1, "🎯 Bounty Posted"),
        markdown::blank_line(),
        markdown::bold("Bounty", &created.id),
        markdown::bold("Title", &created.title),
        markdown::bold("Price", &format!("${} ({})", created.price, created.price_type)),
        markdown::bold("Status", &created.status),
        markdown::blank_line(),
        "Watch for applicants with `bounty_applications`.".to_string(),
    ];

    let id = created.id.clone();
    Ok(text_response(lines).with_metadata(json!({ "bountyId": id })))
}
