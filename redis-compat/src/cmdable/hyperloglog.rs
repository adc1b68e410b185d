use super::{run, Dispatch};
use crate::commands::hyperloglog as cmd;
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// HyperLogLog commands
#[async_trait]
pub trait HyperLogLogCommands: Dispatch {
    /// Whether the estimate changed
    async fn pfadd<V>(&self, ctx: &Context, key: &str, elements: &[V]) -> RedisResult<bool>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::pfadd(key, elements), reply::boolean).await
    }

    /// Approximate cardinality of the union of the given HyperLogLogs
    async fn pfcount(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::pfcount(keys), reply::int).await
    }

    /// Merge HyperLogLogs into `destination`
    async fn pfmerge(&self, ctx: &Context, destination: &str, sources: &[&str]) -> RedisResult<()> {
        run(self, ctx, cmd::pfmerge(destination, sources), reply::ok).await
    }
}
