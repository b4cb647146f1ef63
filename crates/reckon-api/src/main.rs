use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reckon_api::{
    ApiDoc,
    config::{LoadedConfig, ReckonConfig},
    tracing_setup,
};
use tracing::{info, warn};
use utoipa::OpenApi;

#[derive(Parser, Debug)]
#[command(name = "reckon", version, about = "Reckon calculator API server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Describe the service
    Explain,
    /// Print the OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Explain => {
            explain();
            Ok(())
        }
        Command::Openapi => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
            Ok(())
        }
        Command::Serve => start_server(resolve_config(cli)?).await,
    }
}

fn explain() {
    println!("Reckon Calculator API");
    println!("Basic arithmetic over HTTP.\n");
    println!("Endpoints:");
    println!("  GET    /add, /subtract, /multiply, /divide ?left&right");
    println!("  GET    /multipleAdd, /addSubtractAdd       ?left&right");
    println!("  POST   /operations                         create a calculation");
    println!("  PUT    /operations                         replace a calculation");
    println!("  PATCH  /operations                         partially update a calculation");
    println!("  DELETE /operations/{{operation}}             acknowledge a deletion");
    println!("  GET    /health, /redoc, /api-docs/openapi.json");
}

/// File, then environment, then command-line flags.
fn resolve_config(cli: Cli) -> anyhow::Result<LoadedConfig> {
    Ok(ReckonConfig::load(cli.config.as_deref())?.apply_profile().apply_cli(cli.host, cli.port))
}

async fn start_server(loaded: LoadedConfig) -> anyhow::Result<()> {
    tracing_setup::init_tracing(&loaded.config.logging)?;
    loaded.log_summary();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Reckon calculator API");

    let config = loaded.config;
    let addr = config.bind_address();
    let app = reckon_api::create_app_with_config(config);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Web server started successfully");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
