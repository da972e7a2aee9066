//! Scout binary: serves the chat UI or inspects the tool registry.

use clap::{Parser, Subcommand};
use scout_agent::ModelConfig;
use scout_tools::ToolRegistry;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scout", about = "Scout — chat with a web-searching assistant")]
struct Cli {
    /// Path to config file (defaults to scout.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage tools
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(Subcommand)]
enum ToolAction {
    /// List registered tools
    List,
}

#[derive(Deserialize)]
struct ScoutConfig {
    #[serde(default = "default_model")]
    model: ModelConfig,
    #[serde(default)]
    server: ServerConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_model() -> ModelConfig {
    ModelConfig::for_model(default_model_id())
}
fn default_model_id() -> String {
    "gpt-4o-mini".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}

/// Loads the TOML config, falling back to defaults when the default
/// config path does not exist. An explicitly-passed path must exist.
async fn load_config(path: &PathBuf, explicit: bool) -> anyhow::Result<ScoutConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            Ok(ScoutConfig::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (config_path, explicit) = match cli.config {
        Some(path) => (path, true),
        None => (PathBuf::from("scout.toml"), false),
    };
    let mut config = load_config(&config_path, explicit).await?;

    // The credential never lives in the config file; it comes from the
    // environment or the sidebar.
    if let Ok(key) = std::env::var("SCOUT_API_KEY") {
        config.model.api_key = key;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let mut registry = ToolRegistry::new();
            scout_tools::register_builtins(&mut registry);
            info!(count = registry.tool_count(), "Built-in tools registered");

            if config.model.api_key.is_empty() {
                info!("No API key in environment; the sidebar must supply one");
            }

            let app = scout_web::build_router(config.model, Arc::new(registry));

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("Scout listening on http://{addr}");
            axum::serve(listener, app).await?;
        }
        Commands::Tool { action } => match action {
            ToolAction::List => {
                let mut registry = ToolRegistry::new();
                scout_tools::register_builtins(&mut registry);

                let descriptors = registry.descriptors();
                if descriptors.is_empty() {
                    println!("No tools registered.");
                } else {
                    println!("Registered tools:");
                    for descriptor in &descriptors {
                        println!("  {} — {}", descriptor.name, descriptor.description);
                    }
                    println!("\nTotal: {} tool(s)", descriptors.len());
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn config_parses_minimal_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.toml");
        tokio::fs::write(
            &path,
            r#"
[model]
model_id = "gpt-4o-mini"
streaming = false

[server]
port = 8080
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path, true).await.unwrap();
        assert_eq!(config.model.model_id, "gpt-4o-mini");
        assert!(!config.model.streaming);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn missing_default_config_falls_back_to_defaults() {
        let path = PathBuf::from("/nonexistent/scout.toml");
        let config = load_config(&path, false).await.unwrap();
        assert_eq!(config.model.model_id, "gpt-4o-mini");
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn missing_explicit_config_is_an_error() {
        let path = PathBuf::from("/nonexistent/scout.toml");
        assert!(load_config(&path, true).await.is_err());
    }

    #[test]
    fn passing_the_default_path_still_counts_as_explicit() {
        let cli = Cli::try_parse_from(["scout", "--config", "scout.toml", "serve"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("scout.toml")));

        let cli = Cli::try_parse_from(["scout", "serve"]).unwrap();
        assert!(cli.config.is_none());
    }
}
