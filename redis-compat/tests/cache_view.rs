//! Routing of cacheable reads

mod common;

use common::{client_with, MemoryDriver, Recorder, Sent};
use redis_compat::prelude::*;
use std::time::Duration;

fn sent(line: &str, cache_ttl: Option<Duration>) -> Sent {
    Sent {
        line: line.to_string(),
        cache_ttl,
    }
}

#[tokio::test]
async fn test_cache_view_tags_reads_with_its_ttl() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let ctx = Context::background();
    client.set(&ctx, "k", "value", KEEP_TTL).await.unwrap();

    let view = client.cache(Duration::from_secs(30));
    assert_eq!(view.get(&ctx, "k").await.unwrap(), "value");
    assert_eq!(view.strlen(&ctx, "k").await.unwrap(), 5);
    assert_eq!(view.ttl(), Duration::from_secs(30));

    assert_eq!(
        driver.sent(),
        vec![
            sent("SET k value KEEPTTL", None),
            sent("GET k", Some(Duration::from_secs(30))),
            sent("STRLEN k", Some(Duration::from_secs(30))),
        ]
    );
}

#[tokio::test]
async fn test_zero_ttl_view_is_a_plain_read() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());

    let err = client
        .cache(Duration::ZERO)
        .get(&Context::background(), "missing")
        .await
        .unwrap_err();
    assert!(err.is_nil());
    assert_eq!(driver.sent(), vec![sent("GET missing", None)]);
}

#[tokio::test]
async fn test_global_ttl_routes_cacheable_commands_only() {
    let driver = MemoryDriver::new();
    let config = ClientConfig::new("redis://localhost:6379").with_cache_ttl(Duration::from_secs(5));
    let client = Client::new(driver.clone(), config).unwrap();
    let ctx = Context::background();

    client.set(&ctx, "n", "1", KEEP_TTL).await.unwrap();
    client.incr(&ctx, "n").await.unwrap();
    assert_eq!(client.get(&ctx, "n").await.unwrap(), "2");
    // a view's own TTL wins over the global one
    client.cache(Duration::from_secs(1)).get(&ctx, "n").await.unwrap();

    assert_eq!(
        driver.sent(),
        vec![
            sent("SET n 1 KEEPTTL", None),
            sent("INCR n", None),
            sent("GET n", Some(Duration::from_secs(5))),
            sent("GET n", Some(Duration::from_secs(1))),
        ]
    );
}

#[tokio::test]
async fn test_cache_view_calls_are_instrumented() {
    let recorder = Recorder::new();
    let client = client_with(MemoryDriver::new(), recorder.clone());
    let view = client.cache(Duration::from_secs(10));

    view.mget(&Context::background(), &["{t}a", "{t}b"]).await.unwrap();
    assert_eq!(recorder.count("MGET"), (1, 1));
}
