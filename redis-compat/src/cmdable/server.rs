use super::{run, Dispatch};
use crate::commands::server as cmd;
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis_compat_core::{Arg, RedisResult};
use std::collections::HashMap;

/// Server administration and connection commands
#[async_trait]
pub trait ServerCommands: Dispatch {
    /// Start an append-only file rewrite
    async fn bg_rewrite_aof(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::bg_rewrite_aof(), reply::status).await
    }

    /// Start a background save
    async fn bg_save(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::bg_save(), reply::status).await
    }

    /// Nil when no name was set
    async fn client_get_name(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::client_get_name(), reply::string).await
    }

    /// Id of this connection
    async fn client_id(&self, ctx: &Context) -> RedisResult<i64> {
        run(self, ctx, cmd::client_id(), reply::int).await
    }

    /// Connected clients, in the server's text format
    async fn client_list(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::client_list(), reply::string).await
    }

    /// Configuration parameters matching the `parameter` glob
    async fn config_get(&self, ctx: &Context, parameter: &str) -> RedisResult<HashMap<String, String>> {
        run(self, ctx, cmd::config_get(parameter), reply::string_map).await
    }

    /// Reset `INFO` statistics
    async fn config_reset_stat(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::config_reset_stat(), reply::ok).await
    }

    /// Rewrite the config file with the running configuration
    async fn config_rewrite(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::config_rewrite(), reply::ok).await
    }

    /// Set a configuration parameter
    async fn config_set<V>(&self, ctx: &Context, parameter: &str, value: V) -> RedisResult<()>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::config_set(parameter, value), reply::ok).await
    }

    /// Number of keys in the current database
    async fn db_size(&self, ctx: &Context) -> RedisResult<i64> {
        run(self, ctx, cmd::db_size(), reply::int).await
    }

    /// Return `message`
    async fn echo<V>(&self, ctx: &Context, message: V) -> RedisResult<String>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::echo(message), reply::string).await
    }

    /// Delete every key in every database
    async fn flush_all(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::flush_all(), reply::ok).await
    }

    /// `FLUSHALL ASYNC`
    async fn flush_all_async(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::flush_all_async(), reply::ok).await
    }

    /// Delete every key in the current database
    async fn flush_db(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::flush_db(), reply::ok).await
    }

    /// `FLUSHDB ASYNC`
    async fn flush_db_async(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::flush_db_async(), reply::ok).await
    }

    /// The raw `INFO` text; no sections means the default set
    async fn info(&self, ctx: &Context, sections: &[&str]) -> RedisResult<String> {
        run(self, ctx, cmd::info(sections), reply::string).await
    }

    /// Time of the last successful save
    async fn last_save(&self, ctx: &Context) -> RedisResult<DateTime<Utc>> {
        run(self, ctx, cmd::last_save(), reply::unix_secs).await
    }

    /// Bytes used by `key`; nil when it does not exist
    async fn memory_usage(&self, ctx: &Context, key: &str, samples: Option<i64>) -> RedisResult<i64> {
        run(self, ctx, cmd::memory_usage(key, samples), reply::int).await
    }

    /// `PING`
    async fn ping(&self, ctx: &Context) -> RedisResult<String> {
        run(self, ctx, cmd::ping(), reply::status).await
    }

    /// Synchronous save
    async fn save(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::save(), reply::ok).await
    }

    /// Server clock
    async fn time(&self, ctx: &Context) -> RedisResult<DateTime<Utc>> {
        run(self, ctx, cmd::time(), reply::time).await
    }
}
