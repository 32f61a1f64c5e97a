//! Gazette binary entrypoint.
//!
//! Loads configuration from the environment (with `.env` support), opens
//! the article store, and runs the HTTP server until SIGTERM/SIGINT.

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gazette_core::Config;
use gazette_server::{App, Server, ServerConfig};
use gazette_store::ArticleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    info!(addr = %config.addr, db = %config.db_path.display(), "starting gazette");

    let store =
        ArticleStore::open(&config.db_path).context("opening article store")?;

    let server_config = ServerConfig::builder().http_addr(&config.addr).build();
    let app = App::new(config, store);

    Server::new(server_config, app)
        .run()
        .await
        .context("running server")?;

    info!("shutdown complete");
    Ok(())
}
