//! Static file server for the Benefits Calculator front-end

use anyhow::Result;
use benefits_calculator::config::AppConfig;
use benefits_calculator::logging;
use benefits_calculator::server::StaticServer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();
    logging::init("info");

    let config = AppConfig::from_env()?;
    if !config.dist_dir.is_dir() {
        warn!(
            "Asset directory {} does not exist - every request will be a 404",
            config.dist_dir.display()
        );
    }

    let server = StaticServer::bind(&config.bind_addr(), config.dist_dir.clone()).await?;
    info!("Listening on {}", server.local_addr()?);
    server.run().await?;

    Ok(())
}
