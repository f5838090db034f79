use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use workspace_api::config::{WorkspaceConfig, DEFAULT_CONFIG_FILE};
use workspace_api::server::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "workspace-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve a single workspace directory over an authenticated HTTP API")]
struct Args {
    /// Properties file with base_path and gpt_shared_secret
    #[arg(long, env = "WORKSPACE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on; overrides listen_addr from the config file
    #[arg(long, env = "WORKSPACE_LISTEN")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("workspace_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = WorkspaceConfig::load(Some(&args.config))?;

    let state = AppState::new(&config).context("Failed to initialize workspace")?;
    tracing::info!("Serving workspace {:?}", state.resolver.root());
    let app = build_router(Arc::new(state));

    let listen_addr = args.listen.unwrap_or(config.listen_addr);
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {:?}", listen_addr))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Workspace API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
