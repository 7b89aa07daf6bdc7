use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use postboard::{Config, PostStore, Server, logging};

// RUST_LOG=debug LOG_FORMAT=json postboard
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    let store = if config.seed { PostStore::seeded() } else { PostStore::new() };
    info!(posts = store.len().await, seeded = config.seed, "post store ready");

    let addr = config.bind_addr();
    Server::bind(&addr)?
        .serve(postboard::app(Arc::new(store)))
        .await
        .with_context(|| format!("serving on {addr}"))?;

    Ok(())
}
