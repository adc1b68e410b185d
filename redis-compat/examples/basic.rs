//! Basic tour of redis-compat
//!
//! Run with `RUST_LOG=redis_compat=debug cargo run --example basic`.

use redis_compat::prelude::*;
use redis_compat::types::Z;
use redis_compat::MetricsHandler;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let config = ClientConfig::new(url).with_development(true);
    let metrics = Arc::new(MetricsHandler::new());
    let client = Client::connect(config).await?.with_handler(metrics.clone());
    let ctx = Context::background().with_timeout(Duration::from_secs(5));

    client.set(&ctx, "example:greeting", "hello", Expiration::After(Duration::from_secs(30))).await?;
    println!("GET: {}", client.get(&ctx, "example:greeting").await?);
    println!("TTL: {:?}", client.ttl(&ctx, "example:greeting").await?);
    println!("missing: {:?}", client.get(&ctx, "example:missing").await.optional()?);

    client.zadd(&ctx, "example:board", Z::new(10.0, "alice")).await?;
    client.zadd(&ctx, "example:board", Z::new(7.5, "bob")).await?;
    let top = client
        .zrev_range_by_score_withscores(&ctx, "example:board", "+inf", "-inf", None)
        .await?;
    println!("board: {top:?}");

    client
        .safe_mset(&ctx, &[("example:{a}:1", "one"), ("example:{b}:2", "two")])
        .await?;
    let values = client.safe_mget(&ctx, &["example:{a}:1", "example:{b}:2", "example:{c}:3"]).await?;
    println!("safe_mget: {values:?}");

    let cached = client.cache(Duration::from_secs(10));
    println!("cached GET: {}", cached.get(&ctx, "example:greeting").await?);

    let echo = Script::new("return ARGV[1]").with_name("echo");
    println!("script: {:?}", echo.run(&client, &ctx, &[], &["hi"]).await?);

    client
        .del(&ctx, &["example:greeting", "example:board", "example:{a}:1", "example:{b}:2"])
        .await?;

    for (label, stats) in metrics.snapshot() {
        println!("{label}: {} calls, mean {:?}", stats.calls, stats.mean_latency());
    }
    Ok(())
}
