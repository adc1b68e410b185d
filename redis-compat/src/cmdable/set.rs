use super::{run, Dispatch};
use crate::commands::set as cmd;
use crate::commands::ScanArgs;
use crate::context::Context;
use crate::reply;
use crate::types::ScanPage;
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// Set commands
#[async_trait]
pub trait SetCommands: Dispatch {
    /// Add one member; returns 1 when it was new
    async fn sadd<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::sadd(key, member), reply::int).await
    }

    /// Add members; returns how many were new
    async fn sadd_multi<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::sadd_multi(key, members), reply::int).await
    }

    /// Number of members
    async fn scard(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::scard(key), reply::int).await
    }

    /// Members of the first set missing from the others
    async fn sdiff(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::sdiff(keys), reply::strings).await
    }

    /// Store `SDIFF` into `destination`
    async fn sdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::sdiff_store(destination, keys), reply::int).await
    }

    /// Members present in every set
    async fn sinter(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::sinter(keys), reply::strings).await
    }

    /// Cardinality of the intersection; a `limit` of zero means no limit
    async fn sinter_card(&self, ctx: &Context, keys: &[&str], limit: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::sinter_card(keys, limit), reply::int).await
    }

    /// Store `SINTER` into `destination`
    async fn sinter_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::sinter_store(destination, keys), reply::int).await
    }

    /// Whether `member` belongs to the set
    async fn sismember<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<bool>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::sismember(key, member), reply::boolean).await
    }

    /// Every member
    async fn smembers(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::smembers(key), reply::strings).await
    }

    /// Membership of each given member
    async fn smismember<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<bool>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::smismember(key, members), reply::bools).await
    }

    /// Move a member between sets
    async fn smove<V>(&self, ctx: &Context, source: &str, destination: &str, member: V) -> RedisResult<bool>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::smove(source, destination, member), reply::boolean).await
    }

    /// Remove and return a random member
    async fn spop(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::spop(key), reply::string).await
    }

    /// Remove and return up to `count` random members
    async fn spop_count(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::spop_count(key, count), reply::strings).await
    }

    /// A random member
    async fn srandmember(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, cmd::srandmember(key), reply::string).await
    }

    /// Up to `count` random members; negative allows repeats
    async fn srandmember_count(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::srandmember_count(key, count), reply::strings).await
    }

    /// Remove members; returns how many were removed
    async fn srem<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::srem(key, members), reply::int).await
    }

    /// One step of a member iteration
    async fn sscan(&self, ctx: &Context, key: &str, cursor: u64, args: &ScanArgs) -> RedisResult<ScanPage> {
        run(self, ctx, cmd::sscan(key, cursor, args), reply::scan).await
    }

    /// Members of any of the sets
    async fn sunion(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::sunion(keys), reply::strings).await
    }

    /// Store `SUNION` into `destination`
    async fn sunion_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::sunion_store(destination, keys), reply::int).await
    }
}
