use super::{run, Dispatch};
use crate::batch;
use crate::commands::string as cmd;
use crate::commands::SetArgs;
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use redis_compat_core::{Arg, Expiration, RedisResult, RespValue};
use std::time::Duration;

/// String commands
#[async_trait]
pub trait StringCommands: Dispatch {
    /// Append to the value; returns the new length
    async fn append<V>(&self, ctx: &Context, key: &str, value: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::append(key, value), reply::int).await
    }

    /// Decrement by one
    async fn decr(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::decr(key), reply::int).await
    }

    /// Decrement by `decrement`
    async fn decr_by(&self, ctx: &Context, key: &str, decrement: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::decr_by(key, decrement), reply::int).await
    }

    /// Nil when the key does not exist
    async fn get(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::get(key), reply::string).await
    }

    /// Get the value and delete the key
    async fn get_del(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::get_del(key), reply::string).await
    }

    /// Get the value and change its expiration
    async fn get_ex(&self, ctx: &Context, key: &str, expiration: Expiration) -> RedisResult<String> {
        run(self, ctx, cmd::get_ex(key, expiration), reply::string).await
    }

    /// Substring between `start` and `end`, inclusive
    async fn get_range(&self, ctx: &Context, key: &str, start: i64, end: i64) -> RedisResult<String> {
        run(self, ctx, cmd::get_range(key, start, end), reply::string).await
    }

    /// Set a new value and return the old one
    async fn get_set<V>(&self, ctx: &Context, key: &str, value: V) -> RedisResult<String>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::get_set(key, value), reply::string).await
    }

    /// Increment by one
    async fn incr(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::incr(key), reply::int).await
    }

    /// Increment by `increment`
    async fn incr_by(&self, ctx: &Context, key: &str, increment: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::incr_by(key, increment), reply::int).await
    }

    /// Increment by a float
    async fn incr_by_float(&self, ctx: &Context, key: &str, increment: f64) -> RedisResult<f64> {
        run(self, ctx, cmd::incr_by_float(key, increment), reply::float).await
    }

    /// Longest common subsequence of two values
    async fn lcs(&self, ctx: &Context, key1: &str, key2: &str) -> RedisResult<String> {
        run(self, ctx, cmd::lcs(key1, key2), reply::string).await
    }

    /// Length of the longest common subsequence
    async fn lcs_len(&self, ctx: &Context, key1: &str, key2: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::lcs_len(key1, key2), reply::int).await
    }

    /// Values of keys, `None` for missing ones. All keys must share a slot
    async fn mget(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<Option<String>>> {
        run(self, ctx, cmd::mget(keys), reply::opt_strings).await
    }

    /// Set several keys. All keys must share a slot
    async fn mset<V>(&self, ctx: &Context, pairs: &[(&str, V)]) -> RedisResult<()>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::mset(pairs), reply::ok).await
    }

    /// `false` when at least one key already existed and nothing was set
    async fn mset_nx<V>(&self, ctx: &Context, pairs: &[(&str, V)]) -> RedisResult<bool>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::mset_nx(pairs), reply::boolean).await
    }

    /// `SET` with an optional expiration; [`KEEP_TTL`](redis_compat_core::KEEP_TTL)
    /// keeps the current one
    async fn set<V>(&self, ctx: &Context, key: &str, value: V, expiration: Expiration) -> RedisResult<()>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set(key, value, expiration), reply::ok).await
    }

    /// `false` when the key already existed
    async fn set_nx<V>(&self, ctx: &Context, key: &str, value: V, expiration: Expiration) -> RedisResult<bool>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set_nx(key, value, expiration), reply::applied).await
    }

    /// `false` when the key did not exist
    async fn set_xx<V>(&self, ctx: &Context, key: &str, value: V, expiration: Expiration) -> RedisResult<bool>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set_xx(key, value, expiration), reply::applied).await
    }

    /// `SET` with every option.
    ///
    /// The reply is `OK` or nil, or with `GET` the previous value (nil when
    /// there was none).
    async fn set_args<V>(&self, ctx: &Context, key: &str, value: V, args: SetArgs) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set_args(key, value, args), reply::value).await
    }

    /// Set with a timeout
    async fn set_ex<V>(&self, ctx: &Context, key: &str, value: V, expiration: Duration) -> RedisResult<()>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set_ex(key, value, expiration), reply::ok).await
    }

    /// Overwrite part of the value at `offset`
    async fn set_range<V>(&self, ctx: &Context, key: &str, offset: i64, value: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::set_range(key, offset, value), reply::int).await
    }

    /// Length of the value
    async fn strlen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::strlen(key), reply::int).await
    }

    /// `MSET` split by hash slot.
    ///
    /// One `MSET` per slot, sent concurrently. Each slot's subset is applied
    /// atomically; nothing is atomic across slots.
    async fn safe_mset<V>(&self, ctx: &Context, pairs: &[(&str, V)]) -> RedisResult<()>
    where
        V: Into<Arg> + Clone + Sync,
    {
        batch::safe_mset(self.client(), ctx, pairs).await
    }

    /// `MGET` split by hash slot; values come back in the order of `keys`
    async fn safe_mget(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<Option<String>>> {
        batch::safe_mget(self.client(), ctx, keys).await
    }
}
