//! Pre/post call hooks
//!
//! Every dispatched command is bracketed by [`Handler::before`] and
//! [`Handler::after`]. The dispatcher holds a [`CallGuard`] between the two,
//! so `after` runs exactly once on every exit path, including timeouts and
//! futures dropped mid-flight (reported as [`RedisError::Canceled`]).
//!
//! Hooks cannot fail a call: they return nothing and their errors are theirs
//! to handle.

use crate::cmd::Cmd;
use crate::registry::CommandId;
use parking_lot::RwLock;
use redis_compat_core::RedisError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Where the keys of a call come from
#[derive(Debug, Clone, Copy)]
enum KeySource<'a> {
    One(&'a Cmd),
    Batch(&'a [Cmd]),
}

/// What a handler sees about a call
///
/// Keys are borrowed from the request and only materialized when
/// [`CallContext::keys`] is called.
#[derive(Debug, Clone)]
pub struct CallContext<'a> {
    id: &'static CommandId,
    source: KeySource<'a>,
    sub_command: Option<&'a str>,
    cache_ttl: Option<Duration>,
    started: Instant,
}

impl<'a> CallContext<'a> {
    /// Context for a single command
    pub fn new(cmd: &'a Cmd, sub_command: Option<&'a str>) -> Self {
        Self {
            id: cmd.id(),
            source: KeySource::One(cmd),
            sub_command,
            cache_ttl: None,
            started: Instant::now(),
        }
    }

    /// Context for a pipeline or transaction
    pub fn batch(id: &'static CommandId, cmds: &'a [Cmd], sub_command: Option<&'a str>) -> Self {
        Self {
            id,
            source: KeySource::Batch(cmds),
            sub_command,
            cache_ttl: None,
            started: Instant::now(),
        }
    }

    /// Mark the call as served through the client-side cache
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The command identifier
    pub fn id(&self) -> &'static CommandId {
        self.id
    }

    /// The keys the call touches
    pub fn keys(&self) -> Vec<String> {
        match self.source {
            KeySource::One(cmd) => cmd.key_strings(),
            KeySource::Batch(cmds) => cmds.iter().flat_map(Cmd::key_strings).collect(),
        }
    }

    /// Number of keys, without materializing them
    pub fn key_count(&self) -> usize {
        match self.source {
            KeySource::One(cmd) => cmd.key_count(),
            KeySource::Batch(cmds) => cmds.iter().map(Cmd::key_count).sum(),
        }
    }

    /// Sub-command label attached by the caller
    pub fn sub_command_name(&self) -> Option<&str> {
        self.sub_command
    }

    /// TTL hint when the call goes through the cacheable route
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }

    /// Time since the call started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Observer invoked around every call
pub trait Handler: Send + Sync {
    /// Called once before any I/O
    fn before(&self, call: &CallContext<'_>);

    /// Called once with the final error of the call, `None` on success.
    ///
    /// Nil replies arrive as `Some(RedisError::Nil)`.
    fn after(&self, call: &CallContext<'_>, err: Option<&RedisError>);
}

/// Pairs `before` with exactly one `after`
#[must_use = "dropping the guard reports the call as canceled"]
pub struct CallGuard<'a> {
    handler: &'a dyn Handler,
    call: CallContext<'a>,
    finished: bool,
}

impl<'a> CallGuard<'a> {
    /// Run `before` and arm the guard
    pub fn start(handler: &'a dyn Handler, call: CallContext<'a>) -> Self {
        handler.before(&call);
        Self {
            handler,
            call,
            finished: false,
        }
    }

    /// The guarded call
    pub fn call(&self) -> &CallContext<'a> {
        &self.call
    }

    /// Run `after` with the outcome and hand the outcome back unchanged
    pub fn finish<T>(mut self, result: Result<T, RedisError>) -> Result<T, RedisError> {
        self.finished = true;
        self.handler.after(&self.call, result.as_ref().err());
        result
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.handler.after(&self.call, Some(&RedisError::Canceled));
        }
    }
}

/// Logs every call with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl Handler for TracingHandler {
    fn before(&self, call: &CallContext<'_>) {
        debug!(
            command = call.id().label,
            sub_command = call.sub_command_name(),
            keys = call.key_count(),
            "redis call start"
        );
    }

    fn after(&self, call: &CallContext<'_>, err: Option<&RedisError>) {
        let elapsed_us = call.elapsed().as_micros() as u64;
        match err {
            None => debug!(
                command = call.id().label,
                sub_command = call.sub_command_name(),
                elapsed_us,
                cached = call.cache_ttl().is_some(),
                "redis call done"
            ),
            Some(RedisError::Nil) => debug!(
                command = call.id().label,
                sub_command = call.sub_command_name(),
                elapsed_us,
                "redis call returned nil"
            ),
            Some(e) => warn!(
                command = call.id().label,
                sub_command = call.sub_command_name(),
                keys = ?call.keys(),
                elapsed_us,
                error = %e,
                "redis call failed"
            ),
        }
    }
}

/// Does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {
    fn before(&self, _call: &CallContext<'_>) {}
    fn after(&self, _call: &CallContext<'_>, _err: Option<&RedisError>) {}
}

/// Calls several handlers in order
#[derive(Clone, Default)]
pub struct Handlers {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Handlers {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler at the end
    #[must_use]
    pub fn with(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }
}

impl Handler for Handlers {
    fn before(&self, call: &CallContext<'_>) {
        for h in &self.handlers {
            h.before(call);
        }
    }

    fn after(&self, call: &CallContext<'_>, err: Option<&RedisError>) {
        for h in &self.handlers {
            h.after(call, err);
        }
    }
}

#[derive(Default)]
struct LabelStats {
    calls: AtomicU64,
    errors: AtomicU64,
    nils: AtomicU64,
    latency_us: AtomicU64,
}

/// Counters for one command label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandStats {
    /// Completed calls
    pub calls: u64,
    /// Calls that ended in an error other than nil
    pub errors: u64,
    /// Calls that ended with a nil reply
    pub nils: u64,
    /// Sum of call latencies
    pub total_latency: Duration,
}

impl CommandStats {
    /// Mean latency per call
    pub fn mean_latency(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total_latency / self.calls as u32
        }
    }
}

/// Per-label call, error, nil and latency counters
///
/// Counters are atomics; the label map is only write-locked the first time
/// a label is seen.
#[derive(Default)]
pub struct MetricsHandler {
    stats: RwLock<HashMap<&'static str, Arc<LabelStats>>>,
}

impl MetricsHandler {
    /// Create an empty set of counters
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, label: &'static str) -> Arc<LabelStats> {
        if let Some(stats) = self.stats.read().get(label) {
            return Arc::clone(stats);
        }
        Arc::clone(self.stats.write().entry(label).or_default())
    }

    /// Counters for one label
    pub fn stats(&self, label: &str) -> Option<CommandStats> {
        self.stats.read().get(label).map(|s| Self::load(s))
    }

    /// Counters for every label seen so far
    pub fn snapshot(&self) -> HashMap<String, CommandStats> {
        self.stats
            .read()
            .iter()
            .map(|(label, s)| ((*label).to_string(), Self::load(s)))
            .collect()
    }

    /// Forget every counter
    pub fn reset(&self) {
        self.stats.write().clear();
    }

    fn load(s: &LabelStats) -> CommandStats {
        CommandStats {
            calls: s.calls.load(Ordering::Relaxed),
            errors: s.errors.load(Ordering::Relaxed),
            nils: s.nils.load(Ordering::Relaxed),
            total_latency: Duration::from_micros(s.latency_us.load(Ordering::Relaxed)),
        }
    }
}

impl Handler for MetricsHandler {
    fn before(&self, _call: &CallContext<'_>) {}

    fn after(&self, call: &CallContext<'_>, err: Option<&RedisError>) {
        let stats = self.entry(call.id().label);
        stats.calls.fetch_add(1, Ordering::Relaxed);
        stats
            .latency_us
            .fetch_add(call.elapsed().as_micros() as u64, Ordering::Relaxed);
        match err {
            None => {}
            Some(RedisError::Nil) => {
                stats.nils.fetch_add(1, Ordering::Relaxed);
            }
            Some(_) => {
                stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
