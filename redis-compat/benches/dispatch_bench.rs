//! Slot hashing, request building and the dispatch path without I/O

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use redis_compat::cluster::group_by_slot;
use redis_compat::commands::geo::{GeoRadiusQuery, GeoUnit};
use redis_compat::commands::{geo, sorted_set, string};
use redis_compat::protocol::RespEncoder;
use redis_compat::types::Z;
use redis_compat::{
    key_slot, Client, ClientConfig, Cmd, Context, Driver, NoopHandler, RedisResult, RespValue,
    StringCommands, KEEP_TTL,
};
use std::sync::Arc;
use std::time::Duration;

fn bench_key_slot(c: &mut Criterion) {
    c.bench_function("key_slot_plain", |b| {
        b.iter(|| key_slot(black_box("user:1000:profile")));
    });

    c.bench_function("key_slot_hash_tag", |b| {
        b.iter(|| key_slot(black_box("{user:1000}:profile")));
    });

    let keys: Vec<String> = (0..100).map(|i| format!("key:{i}")).collect();
    c.bench_function("group_by_slot_100", |b| {
        b.iter(|| group_by_slot(black_box(keys.iter().map(String::as_str)), |k| *k));
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_set_ex", |b| {
        b.iter(|| string::set(black_box("key"), black_box("value"), Duration::from_secs(60).into()));
    });

    c.bench_function("build_zadd", |b| {
        b.iter(|| sorted_set::zadd(black_box("board"), Z::new(1.5, "player")));
    });

    let query = GeoRadiusQuery::new(200.0, GeoUnit::Km).with_dist().with_coord();
    c.bench_function("build_georadius", |b| {
        b.iter(|| geo::georadius(black_box("Sicily"), 15.0, 37.0, &query));
    });

    let cmd = string::set("key", "value", KEEP_TTL);
    c.bench_function("encode_set", |b| {
        b.iter(|| RespEncoder::encode_command(black_box(cmd.argv())));
    });
}

struct Echo;

#[async_trait]
impl Driver for Echo {
    async fn execute(&self, _cmd: &Cmd) -> RedisResult<RespValue> {
        Ok(RespValue::from("value"))
    }

    async fn execute_batch(&self, cmds: &[Cmd], _atomic: bool) -> RedisResult<Vec<RespValue>> {
        Ok(vec![RespValue::from("value"); cmds.len()])
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let client = Client::new(Arc::new(Echo), ClientConfig::new("redis://localhost:6379"))
        .expect("client")
        .with_handler(Arc::new(NoopHandler));
    let ctx = Context::background().with_timeout(Duration::from_secs(3600));

    c.bench_function("dispatch_get", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(client.get(&ctx, "key").await.expect("reply"));
        });
    });
}

criterion_group!(benches, bench_key_slot, bench_build, bench_dispatch);
criterion_main!(benches);
