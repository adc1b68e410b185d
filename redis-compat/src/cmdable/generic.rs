use super::{run, Dispatch};
use crate::commands::generic as cmd;
use crate::commands::{CopyArgs, ExpireCondition, ScanArgs, Sort};
use crate::context::Context;
use crate::reply;
use crate::types::{Expiry, ScanPage};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use redis_compat_core::{Arg, RedisResult, RespValue};
use std::time::Duration;

/// Keyspace commands
#[async_trait]
pub trait GenericCommands: Dispatch {
    /// Copy `source` to `destination`; true when copied
    async fn copy(&self, ctx: &Context, source: &str, destination: &str, args: CopyArgs) -> RedisResult<bool> {
        run(self, ctx, cmd::copy(source, destination, args), reply::boolean).await
    }

    /// Delete keys; returns how many were removed
    async fn del(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::del(keys), reply::int).await
    }

    /// Serialized value; nil when the key does not exist
    async fn dump(&self, ctx: &Context, key: &str) -> RedisResult<Bytes> {
        run(self, ctx, cmd::dump(key), reply::bytes).await
    }

    /// How many of `keys` exist, counting repeats
    async fn exists(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::exists(keys), reply::int).await
    }

    /// Set a timeout in seconds; false when the key is missing
    async fn expire(&self, ctx: &Context, key: &str, ttl: Duration, condition: ExpireCondition) -> RedisResult<bool> {
        run(self, ctx, cmd::expire(key, ttl, condition), reply::boolean).await
    }

    /// Expire at an absolute time
    async fn expire_at(
        &self,
        ctx: &Context,
        key: &str,
        at: DateTime<Utc>,
        condition: ExpireCondition,
    ) -> RedisResult<bool> {
        run(self, ctx, cmd::expire_at(key, at, condition), reply::boolean).await
    }

    /// Absolute expiry in Unix seconds; `-1` without expiry, `-2` when missing
    async fn expire_time(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::expire_time(key), reply::int).await
    }

    /// Keys matching `pattern`. Scans the whole keyspace
    async fn keys(&self, ctx: &Context, pattern: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::keys(pattern), reply::strings).await
    }

    /// Move a key to another database
    async fn move_key(&self, ctx: &Context, key: &str, db: u16) -> RedisResult<bool> {
        run(self, ctx, cmd::move_key(key, db), reply::boolean).await
    }

    /// Internal encoding of the value
    async fn object_encoding(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::object_encoding(key), reply::string).await
    }

    /// LFU access frequency
    async fn object_freq(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::object_freq(key), reply::int).await
    }

    /// Time since the key was last accessed
    async fn object_idle_time(&self, ctx: &Context, key: &str) -> RedisResult<Duration> {
        let parse = |v: RespValue| -> RedisResult<Duration> {
            Ok(Duration::from_secs(v.as_int()?.max(0) as u64))
        };
        run(self, ctx, cmd::object_idle_time(key), parse).await
    }

    /// Reference count of the value
    async fn object_ref_count(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::object_ref_count(key), reply::int).await
    }

    /// Remove the timeout; false when there was none
    async fn persist(&self, ctx: &Context, key: &str) -> RedisResult<bool> {
        run(self, ctx, cmd::persist(key), reply::boolean).await
    }

    /// Set a timeout in milliseconds
    async fn pexpire(&self, ctx: &Context, key: &str, ttl: Duration, condition: ExpireCondition) -> RedisResult<bool> {
        run(self, ctx, cmd::pexpire(key, ttl, condition), reply::boolean).await
    }

    /// Expire at an absolute time, millisecond precision
    async fn pexpire_at(
        &self,
        ctx: &Context,
        key: &str,
        at: DateTime<Utc>,
        condition: ExpireCondition,
    ) -> RedisResult<bool> {
        run(self, ctx, cmd::pexpire_at(key, at, condition), reply::boolean).await
    }

    /// Absolute expiry as a Unix timestamp in milliseconds
    async fn pexpire_time(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::pexpire_time(key), reply::int).await
    }

    /// Remaining time to live, millisecond precision
    async fn pttl(&self, ctx: &Context, key: &str) -> RedisResult<Expiry> {
        run(self, ctx, cmd::pttl(key), reply::expiry_millis).await
    }

    /// A random key, nil when the database is empty
    async fn random_key(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::random_key(), reply::string).await
    }

    /// Rename a key, overwriting `new_key`
    async fn rename(&self, ctx: &Context, key: &str, new_key: &str) -> RedisResult<()> {
        run(self, ctx, cmd::rename(key, new_key), reply::ok).await
    }

    /// Rename only if `new_key` does not exist
    async fn rename_nx(&self, ctx: &Context, key: &str, new_key: &str) -> RedisResult<bool> {
        run(self, ctx, cmd::rename_nx(key, new_key), reply::boolean).await
    }

    /// Create a key from a `DUMP` payload
    async fn restore<P>(
        &self,
        ctx: &Context,
        key: &str,
        ttl: Duration,
        payload: P,
        replace: bool,
    ) -> RedisResult<()>
    where
        P: Into<Arg> + Send,
    {
        run(self, ctx, cmd::restore(key, ttl, payload, replace), reply::ok).await
    }

    /// One step of a keyspace iteration
    async fn scan(&self, ctx: &Context, cursor: u64, args: &ScanArgs) -> RedisResult<ScanPage> {
        run(self, ctx, cmd::scan(cursor, args), reply::scan).await
    }

    /// Sorted elements; with `GET` patterns, missing lookups read as empty strings
    async fn sort(&self, ctx: &Context, key: &str, sort: &Sort) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::sort(key, sort), reply::strings_or_empty).await
    }

    /// Read-only `SORT`
    async fn sort_ro(&self, ctx: &Context, key: &str, sort: &Sort) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::sort_ro(key, sort), reply::strings_or_empty).await
    }

    /// Number of stored elements
    async fn sort_store(&self, ctx: &Context, key: &str, destination: &str, sort: &Sort) -> RedisResult<i64> {
        run(self, ctx, cmd::sort_store(key, destination, sort), reply::int).await
    }

    /// Update last access time; returns how many keys exist
    async fn touch(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::touch(keys), reply::int).await
    }

    /// Remaining time to live, second precision
    async fn ttl(&self, ctx: &Context, key: &str) -> RedisResult<Expiry> {
        run(self, ctx, cmd::ttl(key), reply::expiry_secs).await
    }

    /// `string`, `list`, `set`, `zset`, `hash`, `stream`, or `none`
    async fn key_type(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::key_type(key), reply::status).await
    }

    /// Delete keys, reclaiming memory in the background
    async fn unlink(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::unlink(keys), reply::int).await
    }

    /// Number of replicas that acknowledged
    async fn wait(&self, ctx: &Context, replicas: i64, timeout: Duration) -> RedisResult<i64> {
        run(self, ctx, cmd::wait(replicas, timeout), reply::int).await
    }
}
