use anyhow::Result;
use rentahuman_core::{run, ServerConfig, ServerMode};

const API_KEY_ENV: &str = "RENTAHUMAN_API_KEY";
const BASE_URL_ENV: &str = "RENTAHUMAN_BASE_URL";
const HEADLESS_ENV: &str = "RENTAHUMAN_HEADLESS";

/// Launches the tool server using environment-informed defaults.
pub async fn run_server() -> Result<()> {
    let mut config = ServerConfig::default();
    config.api_key = resolve_env(API_KEY_ENV);
    config.base_url = resolve_env(BASE_URL_ENV);
    config.mode = resolve_mode();

    tracing::info!(
        target: "rentahuman_mcp",
        base_url = ?config.base_url,
        api_key_present = config.api_key.is_some(),
        mode = ?config.mode,
        "Starting MCP server"
    );
    run(config).await
}

fn resolve_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve_mode() -> ServerMode {
    match std::env::var_os(HEADLESS_ENV) {
        Some(value) if value == "1" || value.eq_ignore_ascii_case("true") => ServerMode::Headless,
        _ => ServerMode::Stdio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_server_honors_headless_env() {
        std::env::set_var(HEADLESS_ENV, "1");
        let result = run_server().await;
        assert!(result.is_ok());
    }
}
