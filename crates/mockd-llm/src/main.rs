use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mockd_llm::create_router;

#[derive(Parser, Debug)]
#[command(name = "mockd-llm")]
#[command(about = "OpenAI-compatible chat completion mock for integration tests")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "MOCKD_LLM_PORT", default_value = "4097")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "MOCKD_LLM_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Enable verbose logging
    #[arg(short, long, env = "MOCKD_LLM_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "mockd_llm=debug,tower_http=debug"
    } else {
        "mockd_llm=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_router();

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;
    info!("Starting chat completion mock on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
