use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mockd_agent::routes::create_router;
use mockd_agent::state::AppState;
use mockd_agent::types::CreateSessionRequest;

#[derive(Parser, Debug)]
#[command(name = "mockd-agent")]
#[command(about = "Session backend mock for integration tests")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "MOCKD_AGENT_PORT", default_value = "4096")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "MOCKD_AGENT_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Enable verbose logging
    #[arg(short, long, env = "MOCKD_AGENT_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "mockd_agent=debug,tower_http=debug"
    } else {
        "mockd_agent=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();

    // Pre-seed exactly one session; tests build their own unseeded state.
    let seeded = state
        .store
        .create_session(CreateSessionRequest {
            title: Some("Test Session".to_string()),
            parent_id: None,
        })
        .await;
    info!(session_id = %seeded.id, "seeded initial session");

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    info!("Starting session backend mock on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
