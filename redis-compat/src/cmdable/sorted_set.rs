use super::{run, Dispatch};
use crate::commands::sorted_set as cmd;
use crate::commands::{Limit, MinMax, ScanArgs, ZAddArgs, ZRangeArgs, ZStore};
use crate::context::Context;
use crate::reply;
use crate::types::{KeyZs, ScanPage, Z, ZWithKey};
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};
use std::time::Duration;

/// Sorted set commands
#[async_trait]
pub trait SortedSetCommands: Dispatch {
    /// Blocking `ZMPOP`
    async fn bzmpop(
        &self,
        ctx: &Context,
        timeout: Duration,
        order: MinMax,
        keys: &[&str],
        count: Option<i64>,
    ) -> RedisResult<KeyZs> {
        run(self, ctx, cmd::bzmpop(timeout, order, keys, count), reply::key_zs).await
    }

    /// Blocking `ZPOPMAX` over several sets
    async fn bzpopmax(&self, ctx: &Context, timeout: Duration, keys: &[&str]) -> RedisResult<ZWithKey> {
        run(self, ctx, cmd::bzpopmax(timeout, keys), reply::z_with_key).await
    }

    /// Blocking `ZPOPMIN` over several sets
    async fn bzpopmin(&self, ctx: &Context, timeout: Duration, keys: &[&str]) -> RedisResult<ZWithKey> {
        run(self, ctx, cmd::bzpopmin(timeout, keys), reply::z_with_key).await
    }

    /// Add or update one member; returns how many were new
    async fn zadd(&self, ctx: &Context, key: &str, member: Z) -> RedisResult<i64> {
        run(self, ctx, cmd::zadd(key, member), reply::int).await
    }

    /// Members added, or added and updated with `ch`
    async fn zadd_args(&self, ctx: &Context, key: &str, args: ZAddArgs, members: &[Z]) -> RedisResult<i64> {
        run(self, ctx, cmd::zadd_args(key, args, members), reply::int).await
    }

    /// New score; nil when a condition prevented the update
    async fn zadd_incr(&self, ctx: &Context, key: &str, args: ZAddArgs, member: Z) -> RedisResult<f64> {
        run(self, ctx, cmd::zadd_incr(key, args, member), reply::float).await
    }

    /// Number of members
    async fn zcard(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::zcard(key), reply::int).await
    }

    /// Members with a score between `min` and `max`
    async fn zcount<A, B>(&self, ctx: &Context, key: &str, min: A, max: B) -> RedisResult<i64>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zcount(key, min, max), reply::int).await
    }

    /// Members of the first set missing from the others
    async fn zdiff(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zdiff(keys), reply::strings).await
    }

    /// `ZDIFF` with scores
    async fn zdiff_withscores(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zdiff_withscores(keys), reply::zs).await
    }

    /// Store `ZDIFF` into `destination`
    async fn zdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::zdiff_store(destination, keys), reply::int).await
    }

    /// Increment a member's score; returns the new score
    async fn zincr_by<V>(&self, ctx: &Context, key: &str, increment: f64, member: V) -> RedisResult<f64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zincr_by(key, increment, member), reply::float).await
    }

    /// Intersection of sorted sets
    async fn zinter(&self, ctx: &Context, store: &ZStore) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zinter(store), reply::strings).await
    }

    /// `ZINTER` with scores
    async fn zinter_withscores(&self, ctx: &Context, store: &ZStore) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zinter_withscores(store), reply::zs).await
    }

    /// Size of the intersection, stopping at `limit` when non-zero
    async fn zinter_card(&self, ctx: &Context, keys: &[&str], limit: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::zinter_card(keys, limit), reply::int).await
    }

    /// Store `ZINTER` into `destination`
    async fn zinter_store(&self, ctx: &Context, destination: &str, store: &ZStore) -> RedisResult<i64> {
        run(self, ctx, cmd::zinter_store(destination, store), reply::int).await
    }

    /// Members between two lexicographic bounds
    async fn zlex_count(&self, ctx: &Context, key: &str, min: &str, max: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::zlex_count(key, min, max), reply::int).await
    }

    /// Pop members from the first non-empty set
    async fn zmpop(&self, ctx: &Context, order: MinMax, keys: &[&str], count: Option<i64>) -> RedisResult<KeyZs> {
        run(self, ctx, cmd::zmpop(order, keys, count), reply::key_zs).await
    }

    /// Scores of members, `None` for missing ones
    async fn zmscore<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<f64>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::zmscore(key, members), reply::opt_floats).await
    }

    /// Pop the highest scored members
    async fn zpopmax(&self, ctx: &Context, key: &str, count: Option<i64>) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zpopmax(key, count), reply::zs).await
    }

    /// Pop the lowest scored members
    async fn zpopmin(&self, ctx: &Context, key: &str, count: Option<i64>) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zpopmin(key, count), reply::zs).await
    }

    /// Random members
    async fn zrandmember(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrandmember(key, count), reply::strings).await
    }

    /// Random members with scores
    async fn zrandmember_withscores(&self, ctx: &Context, key: &str, count: i64) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zrandmember_withscores(key, count), reply::zs).await
    }

    /// Members by rank
    async fn zrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrange(key, start, stop), reply::strings).await
    }

    /// Members and scores by rank
    async fn zrange_withscores(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zrange_withscores(key, start, stop), reply::zs).await
    }

    /// `ZRANGE` with `BYSCORE`/`BYLEX`, `REV` and `LIMIT`
    async fn zrange_args(&self, ctx: &Context, args: &ZRangeArgs) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrange_args(args), reply::strings).await
    }

    /// `ZRANGE` with full options and scores
    async fn zrange_args_withscores(&self, ctx: &Context, args: &ZRangeArgs) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zrange_args_withscores(args), reply::zs).await
    }

    /// Store a `ZRANGE` result into `destination`
    async fn zrange_store(&self, ctx: &Context, destination: &str, args: &ZRangeArgs) -> RedisResult<i64> {
        run(self, ctx, cmd::zrange_store(destination, args), reply::int).await
    }

    /// Members between two lexicographic bounds
    async fn zrange_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrange_by_lex(key, min, max, limit), reply::strings).await
    }

    /// Members with a score between `min` and `max`
    async fn zrange_by_score<A, B>(
        &self,
        ctx: &Context,
        key: &str,
        min: A,
        max: B,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<String>>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrange_by_score(key, min, max, limit), reply::strings).await
    }

    /// `ZRANGEBYSCORE` with scores
    async fn zrange_by_score_withscores<A, B>(
        &self,
        ctx: &Context,
        key: &str,
        min: A,
        max: B,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<Z>>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrange_by_score_withscores(key, min, max, limit), reply::zs).await
    }

    /// Rank of `member`; nil when it is not in the set
    async fn zrank<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrank(key, member), reply::int).await
    }

    /// Remove members; returns how many were removed
    async fn zrem<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::zrem(key, members), reply::int).await
    }

    /// Remove members between two lexicographic bounds
    async fn zrem_range_by_lex(&self, ctx: &Context, key: &str, min: &str, max: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::zrem_range_by_lex(key, min, max), reply::int).await
    }

    /// Remove members within a rank range
    async fn zrem_range_by_rank(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::zrem_range_by_rank(key, start, stop), reply::int).await
    }

    /// Remove members within a score range
    async fn zrem_range_by_score<A, B>(&self, ctx: &Context, key: &str, min: A, max: B) -> RedisResult<i64>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrem_range_by_score(key, min, max), reply::int).await
    }

    /// Members by rank, highest first
    async fn zrev_range(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrev_range(key, start, stop), reply::strings).await
    }

    /// `ZREVRANGE` with scores
    async fn zrev_range_withscores(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zrev_range_withscores(key, start, stop), reply::zs).await
    }

    /// Members between two lexicographic bounds, highest first
    async fn zrev_range_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        max: &str,
        min: &str,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zrev_range_by_lex(key, max, min, limit), reply::strings).await
    }

    /// Members with a score between `max` and `min`, highest first
    async fn zrev_range_by_score<A, B>(
        &self,
        ctx: &Context,
        key: &str,
        max: A,
        min: B,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<String>>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrev_range_by_score(key, max, min, limit), reply::strings).await
    }

    /// `ZREVRANGEBYSCORE` with scores
    async fn zrev_range_by_score_withscores<A, B>(
        &self,
        ctx: &Context,
        key: &str,
        max: A,
        min: B,
        limit: Option<Limit>,
    ) -> RedisResult<Vec<Z>>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrev_range_by_score_withscores(key, max, min, limit), reply::zs).await
    }

    /// Rank of a member counting from the highest score
    async fn zrev_rank<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zrev_rank(key, member), reply::int).await
    }

    /// One step of a member iteration
    async fn zscan(&self, ctx: &Context, key: &str, cursor: u64, args: &ScanArgs) -> RedisResult<ScanPage> {
        run(self, ctx, cmd::zscan(key, cursor, args), reply::scan).await
    }

    /// Score of a member, nil when absent
    async fn zscore<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<f64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, cmd::zscore(key, member), reply::float).await
    }

    /// Union of sorted sets
    async fn zunion(&self, ctx: &Context, store: &ZStore) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::zunion(store), reply::strings).await
    }

    /// `ZUNION` with scores
    async fn zunion_withscores(&self, ctx: &Context, store: &ZStore) -> RedisResult<Vec<Z>> {
        run(self, ctx, cmd::zunion_withscores(store), reply::zs).await
    }

    /// Store `ZUNION` into `destination`
    async fn zunion_store(&self, ctx: &Context, destination: &str, store: &ZStore) -> RedisResult<i64> {
        run(self, ctx, cmd::zunion_store(destination, store), reply::int).await
    }
}
