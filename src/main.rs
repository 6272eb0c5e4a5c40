use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use monday_client::boards::BoardService;
use monday_client::config;
use monday_client::users::UserService;
use monday_client::workspaces::WorkspaceService;
use monday_client::MondayClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("monday_client=info".parse()?)
        )
        .init();

    let config = config::load_config()?;
    info!("Configuration loaded");
    info!("API: {}", config.api.url);

    let client = Arc::new(MondayClient::from_config(&config)?);

    let me = UserService::new(client.clone()).me().await?;
    info!("Authenticated as {} <{}>", me.name, me.email);

    match WorkspaceService::new(client.clone()).list(25).await {
        Ok(workspaces) => {
            for ws in workspaces {
                println!("workspace {}\t{}", ws.id, ws.name);
            }
        }
        Err(e) => warn!("Listing workspaces failed: {}", e),
    }

    match BoardService::new(client.clone()).list(25, 1).await {
        Ok(boards) => {
            for board in boards {
                println!("board {}\t{}", board.id, board.name);
            }
        }
        Err(e) => warn!("Listing boards failed: {}", e),
    }

    let stats = client.rate_limiter().usage_stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    print!("{}", client.metrics().format_prometheus());

    Ok(())
}
