//! SHA-addressed Lua scripts
//!
//! A [`Script`] holds its source and the lowercase hex SHA1 of it. [`Script::run`]
//! sends `EVALSHA` and, when the server answers `NOSCRIPT`, sends the source
//! with `EVAL` instead; that fallback is the only retry it performs.
//!
//! ```no_run
//! use redis_compat::{Client, ClientConfig, Context, Script};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::connect(ClientConfig::new("redis://localhost:6379")).await?;
//! let echo = Script::new("return ARGV[1]").with_name("echo");
//!
//! let reply = echo.run(&client, &Context::background(), &[], &["hello"]).await?;
//! assert_eq!(reply.as_string()?, "hello");
//! # Ok(())
//! # }
//! ```

use crate::client::Client;
use crate::cmdable::ScriptingCommands;
use crate::context::Context;
use redis_compat_core::{Arg, RedisResult, RespValue};
use sha1::{Digest, Sha1};
use std::borrow::Cow;
use tracing::debug;

/// A Lua script and its SHA1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    name: Option<String>,
    source: String,
    sha: String,
}

impl Script {
    /// Hash `source`
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let sha = hex::encode(Sha1::digest(source.as_bytes()));
        Self {
            name: None,
            source,
            sha,
        }
    }

    /// Label calls made through this script with `name`
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lowercase hex SHA1 of the source
    pub fn sha(&self) -> &str {
        &self.sha
    }

    /// The Lua source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The label, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn context<'a>(&self, ctx: &'a Context) -> Cow<'a, Context> {
        match &self.name {
            Some(name) => Cow::Owned(ctx.with_sub_command_name(name.clone())),
            None => Cow::Borrowed(ctx),
        }
    }

    /// `SCRIPT LOAD`; returns the SHA the server computed
    pub async fn load(&self, client: &Client, ctx: &Context) -> RedisResult<String> {
        client.script_load(&self.context(ctx), &self.source).await
    }

    /// Whether the server has the script cached
    pub async fn exists(&self, client: &Client, ctx: &Context) -> RedisResult<Vec<bool>> {
        client.script_exists(&self.context(ctx), &[self.sha.as_str()]).await
    }

    /// `EVAL` with the full source
    pub async fn eval<V>(&self, client: &Client, ctx: &Context, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        client.eval(&self.context(ctx), &self.source, keys, args).await
    }

    /// `EVALSHA`; fails with `NOSCRIPT` when the server does not have the script
    pub async fn eval_sha<V>(
        &self,
        client: &Client,
        ctx: &Context,
        keys: &[&str],
        args: &[V],
    ) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        client.evalsha(&self.context(ctx), &self.sha, keys, args).await
    }

    /// `EVAL_RO`
    pub async fn eval_ro<V>(
        &self,
        client: &Client,
        ctx: &Context,
        keys: &[&str],
        args: &[V],
    ) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        client.eval_ro(&self.context(ctx), &self.source, keys, args).await
    }

    /// `EVALSHA_RO`
    pub async fn eval_sha_ro<V>(
        &self,
        client: &Client,
        ctx: &Context,
        keys: &[&str],
        args: &[V],
    ) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        client.evalsha_ro(&self.context(ctx), &self.sha, keys, args).await
    }

    /// `EVALSHA`, then `EVAL` if the server answered `NOSCRIPT`
    pub async fn run<V>(&self, client: &Client, ctx: &Context, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        match self.eval_sha(client, ctx, keys, args).await {
            Err(err) if err.is_noscript() => {
                debug!(sha = %self.sha, "script not cached, sending source");
                self.eval(client, ctx, keys, args).await
            }
            other => other,
        }
    }

    /// Read-only [`run`](Self::run)
    pub async fn run_ro<V>(
        &self,
        client: &Client,
        ctx: &Context,
        keys: &[&str],
        args: &[V],
    ) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        match self.eval_sha_ro(client, ctx, keys, args).await {
            Err(err) if err.is_noscript() => {
                debug!(sha = %self.sha, "script not cached, sending source");
                self.eval_ro(client, ctx, keys, args).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha_is_lowercase_hex_sha1() {
        let script = Script::new("return ARGV[1]");
        assert_eq!(script.sha().len(), 40);
        assert!(script.sha().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        // sha1("") is well known
        assert_eq!(Script::new("").sha(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_same_source_same_sha() {
        let a = Script::new("return 1");
        let b = Script::new("return 1").with_name("one");
        assert_eq!(a.sha(), b.sha());
        assert_eq!(b.name(), Some("one"));
        assert_ne!(a.sha(), Script::new("return 2").sha());
    }

    #[test]
    fn test_name_labels_context() {
        let ctx = Context::background();
        let plain = Script::new("return 1");
        assert_eq!(plain.context(&ctx).sub_command_name(), None);
        let named = plain.with_name("counter");
        assert_eq!(named.context(&ctx).sub_command_name(), Some("counter"));
    }
}
