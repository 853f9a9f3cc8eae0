use std::{sync::Arc, time::Duration};

use anyhow::Result;
use rentahuman_client::{Client, Config};

pub mod executor;
pub mod markdown;
pub mod state;
pub mod tools;
pub mod transport;
use state::AppContext;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Configuration inputs required to bootstrap the tool server core.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// API key for write operations; falls back to `RENTAHUMAN_API_KEY`.
    pub api_key: Option<String>,
    /// Override for the API base URL (validated as HTTPS by the client).
    pub base_url: Option<String>,
    /// Per-attempt request timeout.
    pub timeout: Option<Duration>,
    /// Retry ceiling for rate-limited and transient failures.
    pub max_retries: Option<u32>,
    /// Timestamp captured during process initialization for diagnostics.
    pub boot_timestamp: OffsetDateTime,
    /// How the server transports requests/responses.
    pub mode: ServerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Stdio,
    Headless,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: None,
            max_retries: None,
            boot_timestamp: OffsetDateTime::now_utc(),
            mode: ServerMode::Stdio,
        }
    }
}

#[derive(Clone)]
pub struct CoreRuntime {
    config: ServerConfig,
    executor: executor::ToolExecutor,
}

impl CoreRuntime {
    pub fn executor(&self) -> executor::ToolExecutor {
        self.executor.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn serve(&self) -> Result<()> {
        match self.config.mode {
            ServerMode::Stdio => transport::serve_stdio(self.executor.clone()).await?,
            ServerMode::Headless => {
                debug!(target: "rentahuman_core", "Headless mode: skipping transport loop")
            }
        }
        Ok(())
    }
}

pub async fn bootstrap(config: ServerConfig) -> Result<CoreRuntime> {
    let mut client_config = Config::default();
    if let Some(api_key) = &config.api_key {
        client_config = client_config.with_api_key(api_key.clone());
    }
    if let Some(base_url) = &config.base_url {
        client_config = client_config.with_base_url(base_url.clone());
    }
    if let Some(timeout) = config.timeout {
        client_config = client_config.with_timeout(timeout);
    }
    if let Some(max_retries) = config.max_retries {
        client_config = client_config.with_max_retries(max_retries);
    }

    let client = Client::with_config(client_config)?;
    let context = Arc::new(AppContext::new(client));
    tools::register_tools(context.clone()).await;

    debug!(
        target: "rentahuman_core",
        api_key_present = context.client.has_api_key(),
        "rentahuman client initialized"
    );

    info!(
        target: "rentahuman_core",
        base_url = ?config.base_url,
        boot_timestamp = %config.boot_timestamp,
        mode = ?config.mode,
        "Core server starting"
    );

    let executor = executor::ToolExecutor::builder(context).build();
    Ok(CoreRuntime { config, executor })
}

pub async fn run(config: ServerConfig) -> Result<()> {
    bootstrap(config).await?.serve().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn headless_run_completes() {
        let mut config = ServerConfig::default();
        config.mode = ServerMode::Headless;
        let runtime = bootstrap(config).await.expect("bootstrap succeeds");
        let result = runtime.serve().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bootstrap_rejects_non_https_base_urls() {
        let mut config = ServerConfig::default();
        config.base_url = Some("http://rentahuman.ai/api".to_string());
        config.mode = ServerMode::Headless;
        assert!(bootstrap(config).await.is_err());
    }

    #[tokio::test]
    async fn bootstrap_registers_the_tool_surface() {
        let mut config = ServerConfig::default();
        config.mode = ServerMode::Headless;
        let runtime = bootstrap(config).await.expect("bootstrap succeeds");
        let names: Vec<String> = runtime
            .executor()
            .list_tools()
            .await
            .into_iter()
            .map(|definition| definition.name)
            .collect();
        assert!(names.contains(&"search_humans".to_string()));
        assert!(names.contains(&"post_bounty".to_string()));
        assert!(names.contains(&"send_message".to_string()));
    }
}

pub use executor::{ToolExecutor, ToolExecutorBuilder, ToolExecutorError};
