use super::{run, Dispatch};
use crate::commands::hash as cmd;
use crate::commands::{ExpireCondition, ScanArgs};
use crate::context::Context;
use crate::reply;
use crate::types::{KeyValue, ScanPage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis_compat_core::{Arg, RedisResult};
use std::collections::HashMap;
use std::time::Duration;

/// Hash commands.
///
/// The field expiry commands (`HEXPIRE` and friends) return one status code
/// per field, in the order the fields were given.
#[async_trait]
pub trait HashCommands: Dispatch {
    /// Delete one field
    async fn hdel<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<i64>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hdel(key, field), reply::int).await
    }

    /// Delete fields; returns how many were removed
    async fn hdel_multi<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<i64>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hdel_multi(key, fields), reply::int).await
    }

    /// Whether the field exists
    async fn hexists<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<bool>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hexists(key, field), reply::boolean).await
    }

    /// Set field timeouts in seconds; one status code per field
    async fn hexpire<F>(
        &self,
        ctx: &Context,
        key: &str,
        ttl: Duration,
        condition: ExpireCondition,
        fields: &[F],
    ) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hexpire(key, ttl, condition, fields), reply::ints).await
    }

    /// Expire fields at an absolute time
    async fn hexpire_at<F>(
        &self,
        ctx: &Context,
        key: &str,
        at: DateTime<Utc>,
        condition: ExpireCondition,
        fields: &[F],
    ) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hexpire_at(key, at, condition, fields), reply::ints).await
    }

    /// Value of a field, nil when missing
    async fn hget<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<String>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hget(key, field), reply::string).await
    }

    /// Every field and value
    async fn hgetall(&self, ctx: &Context, key: &str) -> RedisResult<HashMap<String, String>> {
        run(self, ctx, cmd::hgetall(key), reply::string_map).await
    }

    /// Increment an integer field
    async fn hincr_by<F>(&self, ctx: &Context, key: &str, field: F, increment: i64) -> RedisResult<i64>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hincr_by(key, field, increment), reply::int).await
    }

    /// Increment a float field
    async fn hincr_by_float<F>(&self, ctx: &Context, key: &str, field: F, increment: f64) -> RedisResult<f64>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hincr_by_float(key, field, increment), reply::float).await
    }

    /// Every field name
    async fn hkeys(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::hkeys(key), reply::strings).await
    }

    /// Number of fields
    async fn hlen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::hlen(key), reply::int).await
    }

    /// Values of fields, `None` for missing ones
    async fn hmget<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<Vec<Option<String>>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hmget(key, fields), reply::opt_strings).await
    }

    /// Set several fields
    async fn hmset<V>(&self, ctx: &Context, key: &str, pairs: &[(&str, V)]) -> RedisResult<()>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hmset(key, pairs), reply::ok).await
    }

    /// Remove field timeouts
    async fn hpersist<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hpersist(key, fields), reply::ints).await
    }

    /// Set field timeouts in milliseconds
    async fn hpexpire<F>(
        &self,
        ctx: &Context,
        key: &str,
        ttl: Duration,
        condition: ExpireCondition,
        fields: &[F],
    ) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hpexpire(key, ttl, condition, fields), reply::ints).await
    }

    /// Expire fields at an absolute time, millisecond precision
    async fn hpexpire_at<F>(
        &self,
        ctx: &Context,
        key: &str,
        at: DateTime<Utc>,
        condition: ExpireCondition,
        fields: &[F],
    ) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hpexpire_at(key, at, condition, fields), reply::ints).await
    }

    /// Remaining field lifetimes, millisecond precision
    async fn hpttl<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hpttl(key, fields), reply::ints).await
    }

    /// Random field names
    async fn hrandfield(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::hrandfield(key, count), reply::strings).await
    }

    /// Random fields with their values
    async fn hrandfield_withvalues(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<KeyValue>> {
        run(self, ctx, cmd::hrandfield_withvalues(key, count), reply::key_values).await
    }

    /// One step of a field iteration
    async fn hscan(&self, ctx: &Context, key: &str, cursor: u64, args: &ScanArgs) -> RedisResult<ScanPage> {
        run(self, ctx, cmd::hscan(key, cursor, args), reply::scan).await
    }

    /// Number of fields that were added
    async fn hset<V>(&self, ctx: &Context, key: &str, pairs: &[(&str, V)]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::hset(key, pairs), reply::int).await
    }

    /// Set a field only if it does not exist
    async fn hsetnx<F, V>(&self, ctx: &Context, key: &str, field: F, value: V) -> RedisResult<bool>
    where
        F: Into<Arg> + Send,
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hsetnx(key, field, value), reply::boolean).await
    }

    /// Length of a field's value
    async fn hstrlen<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<i64>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, cmd::hstrlen(key, field), reply::int).await
    }

    /// Remaining field lifetimes, second precision
    async fn httl<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<Vec<i64>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::httl(key, fields), reply::ints).await
    }

    /// Every value
    async fn hvals(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::hvals(key), reply::strings).await
    }
}
