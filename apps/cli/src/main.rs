use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::ProgressBar;
use output::{OutputFormat, Renderer};
use progress::spinner;
use rentahuman_core::{bootstrap, ServerConfig, ServerMode, ToolExecutor, ToolExecutorError};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "rentahuman",
    version,
    about = "Hire real humans from the shell: search, book, post bounties, and message."
)]
struct Cli {
    /// Preferred renderer for command output.
    #[arg(long, global = true, value_enum, default_value = "markdown")]
    format: OutputFormat,
    /// API key for write operations (falls back to RENTAHUMAN_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Override the API base URL (must be HTTPS).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable progress indicators for long-running tasks.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Run the MCP server over STDIO (JSON-RPC transport).
    Serve,
    /// Inspect and invoke available tools.
    Tools {
        #[command(subcommand)]
        command: ToolCommand,
    },
    /// View recent tool telemetry captured by the server.
    Telemetry {
        /// Maximum number of telemetry entries to display (0 = all).
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum ToolCommand {
    /// List registered tools and their descriptions.
    List,
    /// Execute a tool by name with optional JSON arguments.
    Call {
        name: String,
        /// Tool arguments expressed as JSON (`{"key": "value"}`) or @path to a JSON file.
        #[arg(short, long)]
        arguments: Option<String>,
    },
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut config = ServerConfig::default();
    config.api_key = cli.api_key.clone();
    config.base_url = cli.base_url.clone();
    config.mode = match cli.command {
        Command::Serve => ServerMode::Stdio,
        _ => ServerMode::Headless,
    };

    let runtime = bootstrap(config).await?;
    let executor = runtime.executor();

    match &cli.command {
        Command::Serve => runtime.serve().await,
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "rentahuman", &mut std::io::stdout());
            Ok(())
        }
        Command::Tools { command } => {
            let renderer = Renderer::new(cli.format);
            handle_tool_command(command.clone(), &cli, &renderer, executor).await
        }
        Command::Telemetry { limit } => {
            let renderer = Renderer::new(cli.format);
            handle_telemetry_command(*limit, &cli, &renderer, executor).await
        }
    }
}

async fn handle_tool_command(
    command: ToolCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: ToolExecutor,
) -> Result<()> {
    match command {
        ToolCommand::List => {
            let definitions = executor.list_tools().await;
            if cli.quiet {
                return Ok(());
            }
            renderer.tool_definitions(&definitions)?;
        }
        ToolCommand::Call { name, arguments } => {
            let payload = parse_arguments(arguments)?;
            let spinner = spinner(cli.progress_enabled(), format!("Calling `{name}`..."));
            let result = executor.call_tool(&name, payload).await;
            match result {
                Ok(response) => {
                    finish_spinner(spinner, Some(format!("Tool `{name}` completed")));
                    if !cli.quiet {
                        renderer.tool_response(&response)?;
                    }
                }
                Err(ToolExecutorError::UnknownTool(_)) => {
                    finish_spinner(spinner, None);
                    anyhow::bail!("unknown tool: {name}");
                }
                Err(ToolExecutorError::Execution { source, .. }) => {
                    finish_spinner(spinner, None);
                    return Err(source.context(format!("tool `{name}` failed")));
                }
            }
        }
    }

    Ok(())
}

async fn handle_telemetry_command(
    limit: usize,
    cli: &Cli,
    renderer: &Renderer,
    executor: ToolExecutor,
) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }

    let context = executor.context();
    let entries = context.telemetry_snapshot().await;
    if entries.is_empty() {
        renderer.no_telemetry()?;
        return Ok(());
    }

    let total = entries.len();
    let start = if limit == 0 {
        0
    } else {
        total.saturating_sub(limit)
    };
    let sliced: Vec<_> = entries.into_iter().skip(start).collect();
    renderer.telemetry(&sliced)?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rentahuman_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn parse_arguments(arguments: Option<String>) -> Result<Value> {
    match arguments {
        Some(raw) if raw.starts_with('@') => {
            let path = raw.trim_start_matches('@');
            let contents =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid JSON arguments in {path}"))
        }
        Some(raw) => serde_json::from_str(&raw).context("invalid JSON arguments"),
        None => Ok(Value::Object(Default::default())),
    }
}

fn finish_spinner(spinner: Option<ProgressBar>, message: Option<String>) {
    if let Some(progress) = spinner {
        if let Some(msg) = message {
            progress.finish_with_message(msg);
        } else {
            progress.finish_and_clear();
        }
    }
}

mod output {
    use std::fmt::Write;

    use anyhow::Result;
    use clap::ValueEnum;
    use rentahuman_core::state::{TelemetryEntry, ToolDefinition, ToolResponse};
    use serde_json::{self, json};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        Json,
        Markdown,
        Table,
        Text,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn tool_definitions(&self, definitions: &[ToolDefinition]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "tools": definitions });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown => {
                    println!("| Tool | Description |");
                    println!("| --- | --- |");
                    for entry in definitions {
                        println!("| `{}` | {} |", entry.name, sanitize(&entry.description));
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = definitions
                        .iter()
                        .map(|entry| {
                            vec![
                                entry.name.clone(),
                                truncate(&sanitize(&entry.description), 80),
                            ]
                        })
                        .collect();
                    render_table(&["Tool", "Description"], &rows);
                }
                OutputFormat::Text => {
                    for entry in definitions {
                        println!("• {} — {}", entry.name, entry.description);
                    }
                }
            }
            Ok(())
        }

        pub fn tool_response(&self, response: &ToolResponse) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(response)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    for content in &response.content {
                        println!("{}", content.text.trim());
                        println!();
                    }
                    if let Some(metadata) = &response.metadata {
                        println!("```json");
                        println!("{}", serde_json::to_string_pretty(metadata)?);
                        println!("```");
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = response
                        .content
                        .iter()
                        .map(|content| {
                            vec![
                                content.r#type.clone(),
                                truncate(&sanitize(&content.text), 120),
                            ]
                        })
                        .collect();
                    render_table(&["Type", "Content"], &rows);
                    if let Some(metadata) = &response.metadata {
                        println!();
                        println!("Metadata: {}", serde_json::to_string_pretty(metadata)?);
                    }
                }
            }
            Ok(())
        }

        pub fn telemetry(&self, entries: &[TelemetryEntry]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(entries)?);
                }
                OutputFormat::Markdown => {
                    println!("| Timestamp | Tool | Latency (ms) | Success |");
                    println!("| --- | --- | ---: | --- |");
                    for entry in entries {
                        println!(
                            "| {} | `{}` | {} | {} |",
                            entry.timestamp, entry.tool, entry.latency_ms, entry.success
                        );
                    }
                }
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = entries
                        .iter()
                        .map(|entry| {
                            vec![
                                entry.timestamp.to_string(),
                                entry.tool.clone(),
                                entry.latency_ms.to_string(),
                                entry.success.to_string(),
                            ]
                        })
                        .collect();
                    render_table(&["Timestamp", "Tool", "Latency (ms)", "Success"], &rows);
                }
                OutputFormat::Text => {
                    for entry in entries {
                        println!(
                            "[{}] {} — {} ms ({})",
                            entry.timestamp,
                            entry.tool,
                            entry.latency_ms,
                            if entry.success { "success" } else { "error" }
                        );
                        if let Some(metadata) = &entry.metadata {
                            println!("  metadata: {}", serde_json::to_string_pretty(metadata)?);
                        }
                        if let Some(error) = &entry.error {
                            println!("  error: {error}");
                        }
                    }
                }
            }
            Ok(())
        }

        pub fn no_telemetry(&self) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&Vec::<TelemetryEntry>::new())?
                    );
                }
                OutputFormat::Markdown | OutputFormat::Text | OutputFormat::Table => {
                    println!("No telemetry entries recorded yet.");
                }
            }
            Ok(())
        }
    }

    fn render_table(headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
        for row in rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.len());
            }
        }

        fn render_line(columns: &[&str], widths: &[usize]) -> String {
            let mut line = String::new();
            for (idx, value) in columns.iter().enumerate() {
                let width = widths[idx];
                let _ = write!(line, "| {:width$} ", value, width = width);
            }
            line.push('|');
            line
        }

        let header_line = render_line(headers, &widths);
        println!("{header_line}");
        let separator: String = widths
            .iter()
            .map(|width| format!("|{:-^1$}", "", width + 2))
            .collect::<Vec<_>>()
            .join("");
        println!("{separator}|");

        for row in rows {
            let cols: Vec<&str> = row.iter().map(String::as_str).collect();
            println!("{}", render_line(&cols, &widths));
        }
    }

    fn sanitize(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn truncate(value: &str, max: usize) -> String {
        if value.len() <= max {
            value.to_string()
        } else {
            let mut truncated = value
                .chars()
                .take(max.saturating_sub(1))
                .collect::<String>();
            truncated.push('…');
            truncated
        }
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(message_enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !message_enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}
