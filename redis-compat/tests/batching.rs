//! Slot-safe MSET / MGET against a keyspace that rejects cross-slot requests

mod common;

use common::{client_with, Event, MemoryDriver, Recorder};
use redis_compat::prelude::*;
use redis_compat::key_slot;

const KEYS: [&str; 4] = ["key1:{1}", "key2", "key3", "key4:{1}"];

#[test]
fn test_fixture_keys_span_several_slots() {
    assert_eq!(key_slot(KEYS[0]), key_slot(KEYS[3]));
    assert_ne!(key_slot(KEYS[0]), key_slot(KEYS[1]));
    assert_ne!(key_slot(KEYS[1]), key_slot(KEYS[2]));
}

#[tokio::test]
async fn test_plain_mset_fails_across_slots() {
    let client = client_with(MemoryDriver::new(), Recorder::new());
    let pairs: Vec<(&str, &str)> = KEYS.iter().map(|k| (*k, "v")).collect();

    let err = client
        .mset(&Context::background(), &pairs)
        .await
        .unwrap_err();
    assert_eq!(err.server_code(), Some("CROSSSLOT"));
}

#[tokio::test]
async fn test_safe_mset_writes_every_pair() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let pairs = [
        ("key1:{1}", "value1"),
        ("key2", "value2"),
        ("key3", "value3"),
        ("key4:{1}", "value4"),
    ];

    client
        .safe_mset(&Context::background(), &pairs)
        .await
        .unwrap();

    for (key, value) in pairs {
        assert_eq!(driver.value(key).as_deref(), Some(value));
    }
    // one request per slot; the two hash-tagged keys travel together
    let mut lines = driver.lines();
    lines.sort();
    assert_eq!(
        lines,
        vec!["MSET key1:{1} value1 key4:{1} value4", "MSET key2 value2", "MSET key3 value3"]
    );
}

#[tokio::test]
async fn test_safe_mget_keeps_caller_order() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let ctx = Context::background();

    client
        .safe_mset(&ctx, &[("key1:{1}", "value1"), ("key3", "value3"), ("key4:{1}", "value4")])
        .await
        .unwrap();

    let values = client.safe_mget(&ctx, &KEYS).await.unwrap();
    assert_eq!(
        values,
        vec![
            Some("value1".to_string()),
            None,
            Some("value3".to_string()),
            Some("value4".to_string()),
        ]
    );

    // the i-th entry matches a single-key MGET
    for (i, key) in KEYS.iter().enumerate() {
        let single = client.mget(&ctx, &[*key]).await.unwrap();
        assert_eq!(single, vec![values[i].clone()]);
    }
}

#[tokio::test]
async fn test_single_slot_batches_send_one_request() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let ctx = Context::background();

    client
        .safe_mset(&ctx, &[("{user}:a", 1), ("{user}:b", 2)])
        .await
        .unwrap();
    let values = client.safe_mget(&ctx, &["{user}:b", "{user}:a"]).await.unwrap();

    assert_eq!(values, vec![Some("2".to_string()), Some("1".to_string())]);
    assert_eq!(
        driver.lines(),
        vec!["MSET {user}:a 1 {user}:b 2", "MGET {user}:b {user}:a"]
    );
}

#[tokio::test]
async fn test_duplicate_keys_fill_every_position() {
    let client = client_with(MemoryDriver::new(), Recorder::new());
    let ctx = Context::background();

    client.set(&ctx, "key2", "x", KEEP_TTL).await.unwrap();
    let values = client
        .safe_mget(&ctx, &["key2", "key1:{1}", "key2"])
        .await
        .unwrap();
    assert_eq!(values, vec![Some("x".to_string()), None, Some("x".to_string())]);
}

#[tokio::test]
async fn test_each_slot_request_is_instrumented() {
    let recorder = Recorder::new();
    let client = client_with(MemoryDriver::new(), recorder.clone());
    let ctx = Context::background().with_sub_command_name("import");

    client
        .safe_mset(&ctx, &[("key2", "a"), ("key3", "b")])
        .await
        .unwrap();

    assert_eq!(recorder.count("MSET"), (2, 2));
    for event in recorder.events() {
        if let Event::Before { sub, .. } = event {
            assert_eq!(sub.as_deref(), Some("import"));
        }
    }
}

#[tokio::test]
async fn test_failed_slot_fails_the_batch() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let ctx = Context::background();
    let mut pipe = client.pipeline();
    pipe.set("key2", "v");
    pipe.execute(&ctx).await.unwrap();

    // an already expired context fails every slot request
    let expired = ctx.with_timeout(std::time::Duration::ZERO);
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    let err = client.safe_mget(&expired, &KEYS).await.unwrap_err();
    assert!(err.is_timeout());

    assert_eq!(
        client.mget(&ctx, &["key2"]).await.unwrap(),
        vec![Some("v".to_string())]
    );
}

#[tokio::test]
async fn test_one_failing_slot_fails_safe_mset() {
    let driver = MemoryDriver::new();
    driver.take_slot_down(key_slot("key3"));
    let client = client_with(driver.clone(), Recorder::new());
    let pairs: Vec<(&str, &str)> = KEYS.iter().map(|k| (*k, "v")).collect();

    let err = client
        .safe_mset(&Context::background(), &pairs)
        .await
        .unwrap_err();
    assert_eq!(err.server_code(), Some("CLUSTERDOWN"));

    // the other slots were still sent and applied
    assert_eq!(driver.lines().len(), 3);
    assert_eq!(driver.value("key2").as_deref(), Some("v"));
    assert_eq!(driver.value("key4:{1}").as_deref(), Some("v"));
    assert_eq!(driver.value("key3"), None);
}

#[tokio::test]
async fn test_one_failing_slot_fails_safe_mget() {
    let driver = MemoryDriver::new();
    let client = client_with(driver.clone(), Recorder::new());
    let ctx = Context::background();
    client
        .safe_mset(&ctx, &[("key1:{1}", "value1"), ("key2", "value2")])
        .await
        .unwrap();

    driver.take_slot_down(key_slot("key2"));
    let result = client.safe_mget(&ctx, &KEYS).await;
    match result {
        Err(err) => assert_eq!(err.server_code(), Some("CLUSTERDOWN")),
        Ok(values) => panic!("expected an error, got {values:?}"),
    }
}
