//! Cache views
//!
//! `client.cache(ttl)` returns a [`CacheView`]: a handle that only exposes
//! [`CacheableCommands`] and tags every read with `ttl`, so the driver may
//! answer it from its client-side cache. Dispatch is otherwise the same as
//! on the client.

use crate::client::Client;
use crate::cmdable::{CacheableCommands, Dispatch};
use std::time::Duration;

/// Read-only handle whose calls go through the cacheable route
#[derive(Debug, Clone)]
pub struct CacheView {
    client: Client,
    ttl: Duration,
}

impl CacheView {
    /// The TTL hint attached to every call
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Dispatch for CacheView {
    fn client(&self) -> &Client {
        &self.client
    }

    fn cache_ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }
}

impl CacheableCommands for CacheView {}

impl Client {
    /// A view serving cacheable reads from the client-side cache for up to `ttl`.
    ///
    /// A zero `ttl` falls back to the configured global TTL, and to a plain
    /// read when that is zero too.
    pub fn cache(&self, ttl: Duration) -> CacheView {
        CacheView {
            client: self.clone(),
            ttl,
        }
    }
}
