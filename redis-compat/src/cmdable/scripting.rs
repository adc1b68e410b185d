use super::{run, Dispatch};
use crate::commands::script as cmd;
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult, RespValue};

/// Scripts and functions.
///
/// See [`Script`](crate::Script) for SHA-addressed scripts with the
/// `NOSCRIPT` fallback.
#[async_trait]
pub trait ScriptingCommands: Dispatch {
    /// Run a Lua script from source
    async fn eval<V>(&self, ctx: &Context, script: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::eval(script, keys, args), reply::value).await
    }

    /// Read-only `EVAL`
    async fn eval_ro<V>(&self, ctx: &Context, script: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::eval_ro(script, keys, args), reply::value).await
    }

    /// Run a cached script by SHA1
    async fn evalsha<V>(&self, ctx: &Context, sha: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::evalsha(sha, keys, args), reply::value).await
    }

    /// Read-only `EVALSHA`
    async fn evalsha_ro<V>(&self, ctx: &Context, sha: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::evalsha_ro(sha, keys, args), reply::value).await
    }

    /// Call a library function
    async fn fcall<V>(&self, ctx: &Context, function: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::fcall(function, keys, args), reply::value).await
    }

    /// Read-only `FCALL`
    async fn fcall_ro<V>(&self, ctx: &Context, function: &str, keys: &[&str], args: &[V]) -> RedisResult<RespValue>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::fcall_ro(function, keys, args), reply::value).await
    }

    /// Delete a function library
    async fn function_delete(&self, ctx: &Context, library: &str) -> RedisResult<()> {
        run(self, ctx, cmd::function_delete(library), reply::ok).await
    }

    /// Delete every function library
    async fn function_flush(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::function_flush(), reply::ok).await
    }

    /// Name of the loaded library
    async fn function_load(&self, ctx: &Context, code: &str, replace: bool) -> RedisResult<String> {
        run(self, ctx, cmd::function_load(code, replace), reply::string).await
    }

    /// Whether each SHA1 is in the script cache
    async fn script_exists(&self, ctx: &Context, hashes: &[&str]) -> RedisResult<Vec<bool>> {
        run(self, ctx, cmd::script_exists(hashes), reply::bools).await
    }

    /// Empty the script cache
    async fn script_flush(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::script_flush(), reply::ok).await
    }

    /// Kill the running script
    async fn script_kill(&self, ctx: &Context) -> RedisResult<()> {
        run(self, ctx, cmd::script_kill(), reply::ok).await
    }

    /// SHA1 of the script as reported by the server
    async fn script_load(&self, ctx: &Context, script: &str) -> RedisResult<String> {
        run(self, ctx, cmd::script_load(script), reply::string).await
    }
}
