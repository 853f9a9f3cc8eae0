use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::executor::{ToolExecutor, ToolExecutorError};

pub async fn serve_stdio(executor: ToolExecutor) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut writer = stdout;

    let mut buffer = String::new();
    loop {
        buffer.clear();
        let bytes = reader.read_line(&mut buffer).await?;
        if bytes == 0 {
            info!(target: "rentahuman_transport", "STDIO closed; shutting down");
            break;
        }

        debug!(target: "rentahuman_transport", request = buffer.trim());
        let maybe_response = match serde_json::from_str::<RpcRequest>(&buffer) {
            Ok(request) => handle_request(&executor, request).await,
            Err(error) => {
                warn!(target: "rentahuman_transport", error = %error, "Failed to parse request");
                Some(RpcResponse::error(None, -32700, "Parse error"))
            }
        };

        if let Some(response) = maybe_response {
            let payload = serde_json::to_string(&response)?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

impl RpcResponse {
    fn result(id: Option<serde_json::Value>, value: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(value),
            error: None,
        }
    }

    fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

async fn handle_request(executor: &ToolExecutor, request: RpcRequest) -> Option<RpcResponse> {
    let method = request.method.as_str();

    if request.id.is_none() {
        match method {
            "notifications/initialized" => {
                info!(target: "rentahuman_transport", "Client signaled initialized");
            }
            other => {
                debug!(
                    target: "rentahuman_transport",
                    method = other,
                    "Ignoring notification without handler"
                );
            }
        }
        return None;
    }

    let id_value = request.id.clone()?;

    match method {
        "initialize" => Some(RpcResponse::result(
            Some(id_value.clone()),
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": {
                    "name": "rentahuman",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": {
                    "tools": {}
                }
            }),
        )),
        "list_tools" | "tools/list" => {
            let definitions = executor.list_tools().await;
            Some(RpcResponse::result(
                Some(id_value.clone()),
                json!({"tools": definitions}),
            ))
        }
        "call_tool" | "tools/call" => {
            let params = request.params.unwrap_or_else(|| serde_json::json!({}));

            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));

            let name = match params.get("name") {
                Some(value) => match value.as_str() {
                    Some(name) => name.to_string(),
                    None => {
                        return Some(RpcResponse::error(
                            Some(id_value.clone()),
                            -32602,
                            "Tool name must be a string",
                        ))
                    }
                },
                None => {
                    return Some(RpcResponse::error(
                        Some(id_value.clone()),
                        -32602,
                        "Missing tool name",
                    ))
                }
            };

            match executor.call_tool(&name, arguments).await {
                Ok(response) => match serde_json::to_value(response) {
                    Ok(value) => Some(RpcResponse::result(Some(id_value.clone()), value)),
                    Err(error) => Some(RpcResponse::error(
                        Some(id_value.clone()),
                        -32603,
                        format!("Internal error: failed to serialize response: {error}"),
                    )),
                },
                Err(error @ ToolExecutorError::UnknownTool(_)) => Some(RpcResponse::error(
                    Some(id_value.clone()),
                    -32601,
                    error.to_string(),
                )),
                Err(error) => Some(RpcResponse::error(
                    Some(id_value.clone()),
                    -32000,
                    error.to_string(),
                )),
            }
        }
        _ => Some(RpcResponse::error(
            Some(id_value),
            -32601,
            format!("Unknown method: {method}"),
        )),
    }
}
