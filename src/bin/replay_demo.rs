//! Stores a few values, prints their keys, then prints the call history of
//! the store operation.
//!
//! Uses the store selected by `STORE_BACKEND` / `REDIS_URL`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use instrumented_cache::cache::Cache;
use instrumented_cache::config::Config;
use instrumented_cache::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instrumented_cache=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let cache = Cache::flushed(store::connect(&config).await?).await?;

    println!("{}", cache.store("foo").await?);
    println!("{}", cache.store("bar").await?);
    println!("{}", cache.store(42).await?);

    println!("{}", cache.replay().await?);

    Ok(())
}
