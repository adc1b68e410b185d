use super::{run, Dispatch};
use crate::commands::list as cmd;
use crate::commands::{InsertPosition, LPosArgs, Side};
use crate::context::Context;
use crate::reply;
use crate::types::{KeyValue, KeyValues};
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};
use std::time::Duration;

/// List commands.
///
/// Blocking variants wait server-side for `timeout` (zero waits forever) and
/// are also bounded by the context deadline. A timeout without data is
/// reported as nil.
#[async_trait]
pub trait ListCommands: Dispatch {
    /// Blocking `LMOVE`
    async fn blmove(
        &self,
        ctx: &Context,
        source: &str,
        destination: &str,
        from: Side,
        to: Side,
        timeout: Duration,
    ) -> RedisResult<String> {
        run(self, ctx, cmd::blmove(source, destination, from, to, timeout), reply::string).await
    }

    /// Blocking `LMPOP`
    async fn blmpop(
        &self,
        ctx: &Context,
        timeout: Duration,
        keys: &[&str],
        side: Side,
        count: Option<i64>,
    ) -> RedisResult<KeyValues> {
        run(self, ctx, cmd::blmpop(timeout, keys, side, count), reply::key_values_pop).await
    }

    /// Blocking `LPOP` over several lists; nil on timeout
    async fn blpop(&self, ctx: &Context, keys: &[&str], timeout: Duration) -> RedisResult<KeyValue> {
        run(self, ctx, cmd::blpop(keys, timeout), reply::key_value).await
    }

    /// Blocking `RPOP` over several lists; nil on timeout
    async fn brpop(&self, ctx: &Context, keys: &[&str], timeout: Duration) -> RedisResult<KeyValue> {
        run(self, ctx, cmd::brpop(keys, timeout), reply::key_value).await
    }

    /// Blocking `RPOPLPUSH`
    async fn brpoplpush(
        &self,
        ctx: &Context,
        source: &str,
        destination: &str,
        timeout: Duration,
    ) -> RedisResult<String> {
        run(self, ctx, cmd::brpoplpush(source, destination, timeout), reply::string).await
    }

    /// Element at `index`, nil when out of range
    async fn lindex(&self, ctx: &Context, key: &str, index: i64) -> RedisResult<String> {
        run(self, ctx, cmd::lindex(key, index), reply::string).await
    }

    /// New length, `-1` when the pivot was not found
    async fn linsert<P, V>(
        &self,
        ctx: &Context,
        key: &str,
        position: InsertPosition,
        pivot: P,
        element: V,
    ) -> RedisResult<i64>
    where
        P: Into<Arg> + Send,
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::linsert(key, position, pivot, element), reply::int).await
    }

    /// Length of the list
    async fn llen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::llen(key), reply::int).await
    }

    /// Pop from one end of `source` and push to `destination`
    async fn lmove(
        &self,
        ctx: &Context,
        source: &str,
        destination: &str,
        from: Side,
        to: Side,
    ) -> RedisResult<String> {
        run(self, ctx, cmd::lmove(source, destination, from, to), reply::string).await
    }

    /// Pop up to `count` elements from the first non-empty list
    async fn lmpop(
        &self,
        ctx: &Context,
        keys: &[&str],
        side: Side,
        count: Option<i64>,
    ) -> RedisResult<KeyValues> {
        run(self, ctx, cmd::lmpop(keys, side, count), reply::key_values_pop).await
    }

    /// Pop the head, nil on an empty list
    async fn lpop(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::lpop(key), reply::string).await
    }

    /// Pop up to `count` elements from the head
    async fn lpop_count(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::lpop_count(key, count), reply::strings).await
    }

    /// Index of the first match; nil when absent
    async fn lpos<V>(&self, ctx: &Context, key: &str, element: V, args: LPosArgs) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::lpos(key, element, args), reply::int).await
    }

    /// Indices of up to `count` matches
    async fn lpos_count<V>(
        &self,
        ctx: &Context,
        key: &str,
        element: V,
        count: i64,
        args: LPosArgs,
    ) -> RedisResult<Vec<i64>>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::lpos_count(key, element, count, args), reply::ints).await
    }

    /// Prepend one element; returns the new length
    async fn lpush<V>(&self, ctx: &Context, key: &str, element: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::lpush(key, element), reply::int).await
    }

    /// Prepend elements in order; returns the new length
    async fn lpush_multi<V>(&self, ctx: &Context, key: &str, elements: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::lpush_multi(key, elements), reply::int).await
    }

    /// Prepend only if the list exists
    async fn lpushx<V>(&self, ctx: &Context, key: &str, elements: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::lpushx(key, elements), reply::int).await
    }

    /// Elements between `start` and `stop`, inclusive
    async fn lrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::lrange(key, start, stop), reply::strings).await
    }

    /// Remove up to `count` occurrences of `element`
    async fn lrem<V>(&self, ctx: &Context, key: &str, count: i64, element: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::lrem(key, count, element), reply::int).await
    }

    /// Overwrite the element at `index`
    async fn lset<V>(&self, ctx: &Context, key: &str, index: i64, element: V) -> RedisResult<()>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::lset(key, index, element), reply::ok).await
    }

    /// Keep only the given range
    async fn ltrim(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<()> {
        run(self, ctx, cmd::ltrim(key, start, stop), reply::ok).await
    }

    /// Pop the tail, nil on an empty list
    async fn rpop(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::rpop(key), reply::string).await
    }

    /// Pop up to `count` elements from the tail
    async fn rpop_count(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::rpop_count(key, count), reply::strings).await
    }

    /// Move the tail of `source` to the head of `destination`
    async fn rpoplpush(&self, ctx: &Context, source: &str, destination: &str) -> RedisResult<String> {
        run(self, ctx, cmd::rpoplpush(source, destination), reply::string).await
    }

    /// Append one element; returns the new length
    async fn rpush<V>(&self, ctx: &Context, key: &str, element: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::rpush(key, element), reply::int).await
    }

    /// Append elements in order; returns the new length
    async fn rpush_multi<V>(&self, ctx: &Context, key: &str, elements: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::rpush_multi(key, elements), reply::int).await
    }

    /// Append only if the list exists
    async fn rpushx<V>(&self, ctx: &Context, key: &str, elements: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::rpushx(key, elements), reply::int).await
    }
}
