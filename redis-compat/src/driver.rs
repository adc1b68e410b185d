//! The low-level driver seam
//!
//! [`Client`](crate::Client) never talks to a socket itself: every request
//! goes through a [`Driver`]. [`TcpDriver`] is the built-in single-node
//! implementation; tests and embedders can plug in their own.

use crate::client_cache::ClientCache;
use crate::cmd::Cmd;
use crate::pool::Pool;
use crate::registry::Category;
use async_trait::async_trait;
use redis_compat_core::{ClientConfig, RedisResult, RespValue};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Executes built commands against a server
#[async_trait]
pub trait Driver: Send + Sync {
    /// Run one command.
    ///
    /// Server error replies are returned as `Err`; redirects as
    /// `RedisError::Moved` / `RedisError::Ask`.
    async fn execute(&self, cmd: &Cmd) -> RedisResult<RespValue>;

    /// Run a read through the client-side cache, keeping its reply for `ttl`
    async fn execute_cached(&self, cmd: &Cmd, ttl: Duration) -> RedisResult<RespValue> {
        let _ = ttl;
        self.execute(cmd).await
    }

    /// Run several commands in one round-trip.
    ///
    /// Replies come back in order, per-command error replies in place as
    /// `RespValue::Error`. With `atomic` the batch runs inside `MULTI`/`EXEC`.
    async fn execute_batch(&self, cmds: &[Cmd], atomic: bool) -> RedisResult<Vec<RespValue>>;
}

/// Pooled TCP driver for a single Redis node
pub struct TcpDriver {
    pool: Arc<Pool>,
    cache: ClientCache,
}

impl TcpDriver {
    /// Open the pool and verify the server is reachable
    pub async fn connect(config: ClientConfig) -> RedisResult<Self> {
        let endpoint = config.endpoint()?;
        let cache = ClientCache::new(config.client_cache_capacity);
        let pool = Pool::new(config);
        // Fail fast on bad addresses and credentials
        drop(pool.get().await?);
        info!(host = %endpoint.host, port = endpoint.port, "connected to Redis");
        Ok(Self { pool, cache })
    }

    /// The local reply cache
    pub fn cache(&self) -> &ClientCache {
        &self.cache
    }

    fn invalidate(&self, cmd: &Cmd) {
        let id = cmd.id();
        if matches!(id.name, "FLUSHALL" | "FLUSHDB") {
            self.cache.clear();
        } else if id.category != Category::Read && cmd.key_count() > 0 {
            self.cache.invalidate(cmd.key_bytes());
        }
    }
}

#[async_trait]
impl Driver for TcpDriver {
    async fn execute(&self, cmd: &Cmd) -> RedisResult<RespValue> {
        let mut conn = self.pool.get().await?;
        let result = conn.execute(cmd).await;
        self.invalidate(cmd);
        result
    }

    async fn execute_cached(&self, cmd: &Cmd, ttl: Duration) -> RedisResult<RespValue> {
        if let Some(hit) = self.cache.get(cmd.argv()) {
            debug!(command = %cmd.id(), "client cache hit");
            return Ok(hit);
        }
        let read = self.cache.begin_read(cmd.key_bytes().cloned().collect());
        let value = self.execute(cmd).await?;
        if !read.complete(cmd.argv().to_vec(), value.clone(), ttl) {
            debug!(command = %cmd.id(), "keys written during read, reply not cached");
        }
        Ok(value)
    }

    async fn execute_batch(&self, cmds: &[Cmd], atomic: bool) -> RedisResult<Vec<RespValue>> {
        let mut conn = self.pool.get().await?;
        let result = conn.execute_batch(cmds, atomic).await;
        for cmd in cmds {
            self.invalidate(cmd);
        }
        result
    }
}
