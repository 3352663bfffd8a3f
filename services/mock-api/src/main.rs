use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mock_api::{seed, MockBackend};

#[derive(Parser, Debug)]
#[command(name = "mock-api")]
#[command(about = "In-memory BizNest REST backend")]
struct Args {
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Start with an empty backend instead of the demo data
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting BizNest mock API on port {}", args.port);

    let backend = Arc::new(MockBackend::new());
    if !args.no_seed {
        seed::populate(&backend)?;
        info!("Seeded demo data (admin login: {})", seed::DEMO_ADMIN.0);
    }

    mock_api::start_server(backend, args.port).await?;

    Ok(())
}
