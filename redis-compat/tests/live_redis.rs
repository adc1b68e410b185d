//! End-to-end scenarios against a running server
//!
//! Run with `REDIS_URL=redis://localhost:6379 cargo test -- --ignored`.

use redis_compat::commands::bitmap::{BitCount, BitPos};
use redis_compat::commands::generic::Sort;
use redis_compat::prelude::*;
use redis_compat::types::Expiry;
use std::time::Duration;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

async fn setup_client() -> RedisResult<Client> {
    Client::connect(ClientConfig::new(redis_url())).await
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_bitcount() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    client.set(&ctx, "live:bitcount", "foobar", Expiration::Persist).await?;

    assert_eq!(client.bitcount(&ctx, "live:bitcount", None).await?, 26);
    assert_eq!(client.bitcount(&ctx, "live:bitcount", Some(BitCount::new(0, 0))).await?, 4);
    assert_eq!(client.bitcount(&ctx, "live:bitcount", Some(BitCount::new(1, 1))).await?, 6);
    assert_eq!(client.bitcount(&ctx, "live:bitcount:missing", None).await?, 0);

    client.del(&ctx, &["live:bitcount"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_bitpos() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    let key = "live:bitpos";
    client.set(&ctx, key, vec![0xffu8, 0xf0, 0x00], Expiration::Persist).await?;

    let from = |start: i64| BitPos { start: Some(start), ..BitPos::default() };
    assert_eq!(client.bitpos(&ctx, key, false, BitPos::default()).await?, 12);
    assert_eq!(client.bitpos(&ctx, key, true, BitPos::default()).await?, 0);
    assert_eq!(client.bitpos(&ctx, key, false, from(2)).await?, 16);
    assert_eq!(client.bitpos(&ctx, key, true, from(2)).await?, -1);
    let first_byte = BitPos { start: Some(0), end: Some(0), unit: None };
    assert_eq!(client.bitpos(&ctx, key, false, first_byte).await?, -1);

    client.del(&ctx, &[key]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_safe_mget_across_slots() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    let keys = ["key1:{1}", "key2", "key3", "key4:{1}"];
    client.del(&ctx, &keys).await?;

    client
        .safe_mset(&ctx, &[("key1:{1}", "value1"), ("key2", "value2"), ("key4:{1}", "value4")])
        .await?;
    let values = client.safe_mget(&ctx, &keys).await?;
    assert_eq!(
        values,
        vec![
            Some("value1".to_string()),
            Some("value2".to_string()),
            None,
            Some("value4".to_string()),
        ]
    );

    client.del(&ctx, &keys).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_sort() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    client.del(&ctx, &["list", "object_2", "hello_3"]).await?;

    for element in ["1", "3", "2"] {
        client.lpush(&ctx, "list", element).await?;
    }
    assert_eq!(client.sort(&ctx, "list", &Sort::new().limit(0, 2)).await?, vec!["1", "2"]);

    client.set(&ctx, "object_2", "value2", Expiration::Persist).await?;
    client.set(&ctx, "hello_3", "value3", Expiration::Persist).await?;
    let fetched = client
        .sort(&ctx, "list", &Sort::new().get("object_*").get("hello_*"))
        .await?;
    assert_eq!(fetched, vec!["", "", "value2", "", "", "value3"]);

    client.del(&ctx, &["list", "object_2", "hello_3"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_script_fallback() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    client.script_flush(&ctx).await?;
    let script = Script::new("return ARGV[1]");

    let err = script.eval_sha(&client, &ctx, &[], &["hello"]).await.unwrap_err();
    assert!(err.is_noscript(), "unexpected error: {err}");

    let reply = script.run(&client, &ctx, &[], &["hello"]).await?;
    assert_eq!(reply.as_string()?, "hello");
    assert_eq!(script.exists(&client, &ctx).await?, vec![true]);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_set_keepttl() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    let key = "live:keepttl";

    client.set(&ctx, key, "v", Duration::from_secs(5).into()).await?;
    client.set(&ctx, key, "v2", KEEP_TTL).await?;

    let remaining = client.ttl(&ctx, key).await?.remaining();
    assert!(remaining.is_some_and(|d| d > Duration::ZERO && d <= Duration::from_secs(5)));
    assert_eq!(client.get(&ctx, key).await?, "v2");

    client.del(&ctx, &[key]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_set_expiry_bounds() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();

    client.set(&ctx, "live:ex", "v", Expiration::After(Duration::from_secs(10))).await?;
    match client.ttl(&ctx, "live:ex").await? {
        Expiry::In(d) => assert!(d > Duration::ZERO && d <= Duration::from_secs(10)),
        other => panic!("expected a TTL, got {other:?}"),
    }

    client.set(&ctx, "live:px", "v", Expiration::After(Duration::from_millis(1500))).await?;
    match client.pttl(&ctx, "live:px").await? {
        Expiry::In(d) => assert!(d > Duration::ZERO && d <= Duration::from_millis(1500)),
        other => panic!("expected a TTL, got {other:?}"),
    }

    client.set(&ctx, "live:ex", "v", Expiration::Persist).await?;
    assert_eq!(client.ttl(&ctx, "live:ex").await?, Expiry::Persistent);
    assert_eq!(client.ttl(&ctx, "live:missing").await?, Expiry::Missing);

    client.del(&ctx, &["live:ex", "live:px"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_counter_on_text_is_server_error() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    let key = "live:text";
    client.set(&ctx, key, "hello", Expiration::Persist).await?;

    let not_integer = "ERR value is not an integer or out of range";
    assert_eq!(client.incr(&ctx, key).await.unwrap_err().to_string(), not_integer);
    assert_eq!(client.decr(&ctx, key).await.unwrap_err().to_string(), not_integer);
    assert_eq!(client.incr_by(&ctx, key, 3).await.unwrap_err().to_string(), not_integer);
    assert_eq!(client.decr_by(&ctx, key, 3).await.unwrap_err().to_string(), not_integer);

    let err = client.incr_by_float(&ctx, key, 1.5).await.unwrap_err();
    assert!(matches!(err, RedisError::Server(_)));
    assert_eq!(err.to_string(), "ERR value is not a valid float");

    client.del(&ctx, &[key]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_pipeline_and_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    client.del(&ctx, &["live:pipe"]).await?;

    let mut pipe = client.pipeline();
    pipe.set("live:pipe", "1").incr("live:pipe").get("live:pipe");
    let mut results = pipe.execute(&ctx).await?;
    results.next_with(redis_compat::reply::ok)?;
    assert_eq!(results.next_with(redis_compat::reply::int)?, 2);
    assert_eq!(results.next_with(redis_compat::reply::string)?, "2");

    let mut tx = client.tx_pipeline();
    tx.incr_by("live:pipe", 10).get("live:pipe");
    let mut results = tx.execute(&ctx).await?;
    assert_eq!(results.next_with(redis_compat::reply::int)?, 12);
    assert_eq!(results.next_with(redis_compat::reply::string)?, "12");

    client.del(&ctx, &["live:pipe"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_cache_view_reads() -> Result<(), Box<dyn std::error::Error>> {
    let client = setup_client().await?;
    let ctx = Context::background();
    client.set(&ctx, "live:cached", "v1", Expiration::Persist).await?;

    let view = client.cache(Duration::from_secs(60));
    assert_eq!(view.get(&ctx, "live:cached").await?, "v1");
    // writes through the same client invalidate the cached entry
    client.set(&ctx, "live:cached", "v2", Expiration::Persist).await?;
    assert_eq!(view.get(&ctx, "live:cached").await?, "v2");

    client.del(&ctx, &["live:cached"]).await?;
    Ok(())
}
