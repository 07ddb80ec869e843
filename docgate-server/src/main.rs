use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use docgate_mongodb::MongoStore;
use docgate_redis::RedisCache;
use docgate_server::config::Config;
use docgate_server::{AppState, build_router, models};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    let registry = Arc::new(models::registry()?);
    let store = MongoStore::connect(&config.mongo.url, &config.mongo.database).await?;
    tracing::info!(database = config.mongo.database, "document store connected");
    let cache = RedisCache::connect(&config.redis.url).await?;

    let app = build_router(
        AppState::new(registry, Arc::new(store), Arc::new(cache)),
        &config.client.dir,
    );

    let addr: SocketAddr = config.server.socket_addr().parse()?;
    tracing::info!(%addr, "docgate listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
