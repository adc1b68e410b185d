//! High-level Redis client
//!
//! [`Client`] is the single dispatch point: every typed command method, the
//! cache view, scripts, batches and pipelines end up in
//! [`Client::execute`] or [`Client::execute_batch`]. Each call is bracketed
//! by the configured [`Handler`], bounded by the caller's [`Context`]
//! deadline, and routed either straight to the driver or through its
//! client-side cache.

use crate::cmd::Cmd;
use crate::context::Context;
use crate::driver::{Driver, TcpDriver};
use crate::handler::{CallContext, CallGuard, Handler, TracingHandler};
use crate::pipeline::{Pipeline, TxPipeline};
use crate::registry::CommandId;
use crate::types::ScanPage;
use futures::Stream;
use redis_compat_core::{ClientConfig, RedisError, RedisResult, RespValue};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

struct Inner {
    driver: Arc<dyn Driver>,
    handler: Arc<dyn Handler>,
    config: ClientConfig,
}

/// High-level Redis client
///
/// Cheap to clone; clones share the driver, the handler and the configuration.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connection_string", &self.inner.config.connection_string)
            .field("protocol", &self.inner.config.protocol)
            .field("cache_ttl", &self.inner.config.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Wrap an existing driver.
    ///
    /// With `development` set the configuration is validated and logged.
    pub fn new(driver: Arc<dyn Driver>, config: ClientConfig) -> RedisResult<Self> {
        if config.development {
            config.validate()?;
            info!(
                connection_string = %config.connection_string,
                protocol = ?config.protocol,
                cache_ttl = ?config.cache_ttl,
                database = config.database,
                pool_size = config.pool.max_size,
                "redis client configured"
            );
        }
        Ok(Self {
            inner: Arc::new(Inner {
                driver,
                handler: Arc::new(TracingHandler),
                config,
            }),
        })
    }

    /// Connect with the built-in TCP driver
    pub async fn connect(config: ClientConfig) -> RedisResult<Self> {
        if config.development {
            config.validate()?;
        }
        let driver = TcpDriver::connect(config.clone()).await?;
        Self::new(Arc::new(driver), config)
    }

    /// Replace the handler; the returned client shares the driver
    #[must_use]
    pub fn with_handler(&self, handler: Arc<dyn Handler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                driver: Arc::clone(&self.inner.driver),
                handler,
                config: self.inner.config.clone(),
            }),
        }
    }

    /// The configuration
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The driver
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.inner.driver
    }

    /// The handler
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.inner.handler
    }

    /// TTL of the cacheable route for `id`, if it applies
    fn route_ttl(&self, id: &CommandId, view_ttl: Option<Duration>) -> Option<Duration> {
        if !id.cacheable {
            return None;
        }
        view_ttl
            .filter(|ttl| !ttl.is_zero())
            .or_else(|| Some(self.inner.config.cache_ttl).filter(|ttl| !ttl.is_zero()))
    }

    /// Dispatch one command and parse its reply.
    ///
    /// `cache_ttl` is the TTL of the cache view the call came from, if any.
    pub async fn execute<T, P>(
        &self,
        ctx: &Context,
        cmd: Cmd,
        cache_ttl: Option<Duration>,
        parse: P,
    ) -> RedisResult<T>
    where
        P: FnOnce(RespValue) -> RedisResult<T>,
    {
        let ttl = self.route_ttl(cmd.id(), cache_ttl);
        let call = CallContext::new(&cmd, ctx.sub_command_name()).with_cache_ttl(ttl);
        let guard = CallGuard::start(self.inner.handler.as_ref(), call);

        let driver = &self.inner.driver;
        let reply = with_deadline(ctx, async {
            match ttl {
                Some(ttl) => driver.execute_cached(&cmd, ttl).await,
                None => driver.execute(&cmd).await,
            }
        })
        .await;
        guard.finish(reply.and_then(parse))
    }

    /// Dispatch a batch under one handler call labelled `id`
    pub async fn execute_batch(
        &self,
        ctx: &Context,
        id: &'static CommandId,
        cmds: &[Cmd],
        atomic: bool,
    ) -> RedisResult<Vec<RespValue>> {
        let call = CallContext::batch(id, cmds, ctx.sub_command_name());
        let guard = CallGuard::start(self.inner.handler.as_ref(), call);
        if cmds.is_empty() {
            return guard.finish(Ok(Vec::new()));
        }
        let driver = &self.inner.driver;
        let replies = with_deadline(ctx, driver.execute_batch(cmds, atomic)).await;
        guard.finish(replies)
    }

    /// Start a pipeline
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.clone())
    }

    /// Start a `MULTI`/`EXEC` transaction
    pub fn tx_pipeline(&self) -> TxPipeline {
        TxPipeline::new(self.clone())
    }

    /// Iterate a `SCAN` family command page by page until the cursor is back at zero.
    ///
    /// `build` receives the cursor of the next page.
    pub fn scan_pages<F>(&self, ctx: &Context, build: F) -> impl Stream<Item = RedisResult<ScanPage>>
    where
        F: Fn(u64) -> Cmd,
    {
        let client = self.clone();
        let ctx = ctx.clone();
        futures::stream::unfold(Some(0u64), move |cursor| {
            let client = client.clone();
            let ctx = ctx.clone();
            let cmd = cursor.map(&build);
            async move {
                let cmd = cmd?;
                let page = client.execute(&ctx, cmd, None, crate::reply::scan).await;
                let next = match &page {
                    Ok(p) if p.cursor != 0 => Some(p.cursor),
                    _ => None,
                };
                debug!(?next, "scan page");
                Some((page, next))
            }
        })
    }
}

async fn with_deadline<T>(
    ctx: &Context,
    fut: impl Future<Output = RedisResult<T>>,
) -> RedisResult<T> {
    match ctx.deadline() {
        Some(_) if ctx.is_expired() => Err(RedisError::Timeout),
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .unwrap_or(Err(RedisError::Timeout)),
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::string;
    use crate::registry;
    use async_trait::async_trait;
    use futures::StreamExt;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Scripted {
        replies: Mutex<Vec<RespValue>>,
        cached: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Driver for Scripted {
        async fn execute(&self, _cmd: &Cmd) -> RedisResult<RespValue> {
            Ok(self.replies.lock().pop().unwrap_or(RespValue::Null))
        }

        async fn execute_cached(&self, cmd: &Cmd, ttl: Duration) -> RedisResult<RespValue> {
            self.cached.lock().push(ttl);
            self.execute(cmd).await
        }

        async fn execute_batch(&self, cmds: &[Cmd], _atomic: bool) -> RedisResult<Vec<RespValue>> {
            Ok(cmds.iter().map(|_| RespValue::from("OK")).collect())
        }
    }

    struct Slow;

    #[async_trait]
    impl Driver for Slow {
        async fn execute(&self, _cmd: &Cmd) -> RedisResult<RespValue> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(RespValue::Null)
        }

        async fn execute_batch(&self, _cmds: &[Cmd], _atomic: bool) -> RedisResult<Vec<RespValue>> {
            Ok(Vec::new())
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("redis://localhost:6379")
    }

    #[tokio::test]
    async fn test_nil_reply_is_nil_error() {
        let client = Client::new(Arc::new(Scripted::default()), config()).unwrap();
        let result = client
            .execute(&Context::background(), string::get("k"), None, crate::reply::string)
            .await;
        assert!(redis_compat_core::is_nil(&result));
    }

    #[tokio::test]
    async fn test_global_cache_ttl_routes_cacheable_reads_only() {
        let driver = Arc::new(Scripted::default());
        let client = Client::new(
            driver.clone(),
            config().with_cache_ttl(Duration::from_secs(3)),
        )
        .unwrap();
        let ctx = Context::background();
        let _ = client.execute(&ctx, string::get("k"), None, crate::reply::value).await;
        let _ = client.execute(&ctx, string::incr("k"), None, crate::reply::value).await;
        let _ = client
            .execute(&ctx, string::strlen("k"), Some(Duration::from_secs(9)), crate::reply::value)
            .await;
        assert_eq!(
            *driver.cached.lock(),
            vec![Duration::from_secs(3), Duration::from_secs(9)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out() {
        let client = Client::new(Arc::new(Slow), config()).unwrap();
        let ctx = Context::background().with_timeout(Duration::from_millis(50));
        let result = client
            .execute(&ctx, string::get("k"), None, crate::reply::string)
            .await;
        assert!(matches!(result, Err(RedisError::Timeout)));
    }

    #[tokio::test]
    async fn test_development_rejects_bad_config() {
        let bad = config().with_development(true).with_operation_timeout(Duration::ZERO);
        assert!(matches!(
            Client::new(Arc::new(Scripted::default()), bad),
            Err(RedisError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_scan_pages_follow_cursor() {
        let driver = Arc::new(Scripted::default());
        // popped from the back
        *driver.replies.lock() = vec![
            RespValue::Array(vec![RespValue::from("0"), RespValue::Array(vec![RespValue::from("c")])]),
            RespValue::Array(vec![
                RespValue::from("7"),
                RespValue::Array(vec![RespValue::from("a"), RespValue::from("b")]),
            ]),
        ];
        let client = Client::new(driver, config()).unwrap();
        let pages: Vec<_> = client
            .scan_pages(&Context::background(), |cursor| {
                crate::commands::generic::scan(cursor, &Default::default())
            })
            .collect()
            .await;
        let keys: Vec<String> = pages
            .into_iter()
            .flat_map(|p| p.unwrap().keys)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_driver() {
        let client = Client::new(Arc::new(Slow), config()).unwrap();
        let replies = client
            .execute_batch(&Context::background(), &registry::PIPELINE, &[], false)
            .await
            .unwrap();
        assert!(replies.is_empty());
    }
}
