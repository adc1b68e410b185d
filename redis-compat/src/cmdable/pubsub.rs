use super::{run, Dispatch};
use crate::commands::pubsub as cmd;
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// Publish side of pub/sub
#[async_trait]
pub trait PubSubCommands: Dispatch {
    /// Number of subscribers that received the message
    async fn publish<V>(&self, ctx: &Context, channel: &str, message: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::publish(channel, message), reply::int).await
    }

    /// Publish to a shard channel; returns the number of receivers
    async fn spublish<V>(&self, ctx: &Context, channel: &str, message: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::spublish(channel, message), reply::int).await
    }

    /// Active channels; an empty pattern lists all of them
    async fn pubsub_channels(&self, ctx: &Context, pattern: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::pubsub_channels(pattern), reply::strings).await
    }

    /// Number of pattern subscriptions
    async fn pubsub_numpat(&self, ctx: &Context) -> RedisResult<i64> {
        run(self, ctx, cmd::pubsub_numpat(), reply::int).await
    }

    /// Subscriber counts per channel
    async fn pubsub_numsub(&self, ctx: &Context, channels: &[&str]) -> RedisResult<Vec<(String, i64)>> {
        run(self, ctx, cmd::pubsub_numsub(channels), reply::string_ints).await
    }

    /// Active shard channels matching `pattern`
    async fn pubsub_shard_channels(&self, ctx: &Context, pattern: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::pubsub_shard_channels(pattern), reply::strings).await
    }
}
