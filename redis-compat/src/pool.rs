//! Connection pool
//!
//! A semaphore bounds the number of checked-out connections; idle ones are
//! kept on a stack and reused most-recent-first. A connection goes back on
//! the stack when its guard drops, unless it is broken or was abandoned in
//! the middle of an exchange.

use crate::connection::Connection;
use parking_lot::Mutex;
use redis_compat_core::{ClientConfig, RedisError, RedisResult};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::debug;

/// Bounded pool of connections to one server
pub struct Pool {
    idle: Mutex<Vec<Connection>>,
    semaphore: Arc<Semaphore>,
    config: ClientConfig,
}

impl Pool {
    /// Create an empty pool; connections are opened on demand
    pub fn new(config: ClientConfig) -> Arc<Self> {
        Arc::new(Self {
            idle: Mutex::new(Vec::with_capacity(config.pool.max_size)),
            semaphore: Arc::new(Semaphore::new(config.pool.max_size)),
            config,
        })
    }

    /// Check out a connection, opening one when none is idle
    pub async fn get(self: &Arc<Self>) -> RedisResult<PooledConnection> {
        let permit = timeout(
            self.config.pool.acquire_timeout,
            Arc::clone(&self.semaphore).acquire_owned(),
        )
        .await
        .map_err(|_| RedisError::Pool("timed out waiting for a connection".to_string()))?
        .map_err(|_| RedisError::Pool("pool is closed".to_string()))?;

        let idle = self.idle.lock().pop();
        let conn = match idle {
            Some(conn) => conn,
            None => {
                debug!("opening pooled connection");
                Connection::connect(&self.config).await?
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    /// Add an already open connection to the idle set
    pub fn put(&self, conn: Connection) {
        if conn.is_reusable() {
            self.idle.lock().push(conn);
        }
    }

    /// Number of idle connections
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of connections that can still be checked out
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A checked-out connection, returned to the pool on drop
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<Pool>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only taken in Drop
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if conn.is_reusable() {
                self.pool.put(conn);
            } else {
                debug!("discarding unusable connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis_compat_core::PoolConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_times_out_when_exhausted() {
        let config = ClientConfig::new("redis://127.0.0.1:6379").with_pool_config(PoolConfig {
            max_size: 1,
            acquire_timeout: Duration::from_millis(20),
        });
        let pool = Pool::new(config);
        let _held = Arc::clone(&pool.semaphore).acquire_owned().await.unwrap();
        assert_eq!(pool.available(), 0);
        let err = pool.get().await.err().unwrap();
        assert!(matches!(err, RedisError::Pool(_)));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_connections_are_reused() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());
        let pool = Pool::new(ClientConfig::new(url));
        {
            let mut conn = pool.get().await.unwrap();
            conn.execute(&crate::commands::server::ping()).await.unwrap();
        }
        assert_eq!(pool.idle_count(), 1);
        let _conn = pool.get().await.unwrap();
        assert_eq!(pool.idle_count(), 0);
    }
}
