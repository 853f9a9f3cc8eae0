use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::state::{AppContext, ToolContent, ToolEntry, ToolHandler, ToolResponse};

mod bounty_applications;
mod create_booking;
mod get_human;
mod list_bookings;
mod list_bounties;
mod list_skills;
mod post_bounty;
mod search_humans;
mod send_message;
mod start_conversation;

pub async fn register_tools(context: Arc<AppContext>) {
    let tools = [
        search_humans::definition(),
        get_human::definition(),
        list_skills::definition(),
        create_booking::definition(),
        list_bookings::definition(),
        post_bounty::definition(),
        list_bounties::definition(),
        bounty_applications::definition(),
        start_conversation::definition(),
        send_message::definition(),
    ];

    let registry = context.tools.clone();

    for (definition, handler) in tools {
        let entry = ToolEntry {
            definition,
            handler,
        };
        registry.insert(entry).await;
    }
}

pub(crate) fn text_response(lines: impl IntoIterator<Item = String>) -> ToolResponse {
    ToolResponse {
        content: vec![ToolContent {
            r#type: "text".to_string(),
            text: lines.into_iter().collect::<Vec<_>>().join("\n"),
        }],
        metadata: None,
    }
}

pub(crate) fn wrap_handler<F, Fut>(handler: F) -> ToolHandler
where
    F: Fn(Arc<AppContext>, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<ToolResponse>> + Send + 'static,
{
    Arc::new(move |context, value| {
        let ctx = context.clone();
        let fut = handler(ctx, value);
        Box::pin(fut)
    })
}

pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|error| anyhow!("invalid arguments: {error}"))
}
