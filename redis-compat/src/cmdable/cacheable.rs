use super::{run, Dispatch};
use crate::commands::{self, BitCount, BitPos, GeoRadiusQuery, GeoSearchQuery, LPosArgs, Limit, Sort, ZRangeArgs};
use crate::context::Context;
use crate::reply;
use crate::types::{Expiry, GeoLocation, GeoPos, Z};
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};
use std::collections::HashMap;

/// Reads that can be served from the client-side cache.
///
/// The same signatures and replies as the family traits; every call carries
/// the TTL hint of the handle it is issued on.
#[async_trait]
pub trait CacheableCommands: Dispatch {
    /// Count set bits, optionally within a range
    async fn bitcount(&self, ctx: &Context, key: &str, range: Option<BitCount>) -> RedisResult<i64> {
        run(self, ctx, commands::bitmap::bitcount(key, range), reply::int).await
    }

    /// Position of the first bit equal to `bit`, `-1` if none
    async fn bitpos(&self, ctx: &Context, key: &str, bit: bool, range: BitPos) -> RedisResult<i64> {
        run(self, ctx, commands::bitmap::bitpos(key, bit, range), reply::int).await
    }

    /// Bit value at `offset`
    async fn getbit(&self, ctx: &Context, key: &str, offset: i64) -> RedisResult<i64> {
        run(self, ctx, commands::bitmap::getbit(key, offset), reply::int).await
    }

    /// Number of the given keys that exist
    async fn exists(&self, ctx: &Context, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, commands::generic::exists(keys), reply::int).await
    }

    /// Absolute expiry as a Unix timestamp in seconds
    async fn expire_time(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::generic::expire_time(key), reply::int).await
    }

    /// Absolute expiry as a Unix timestamp in milliseconds
    async fn pexpire_time(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::generic::pexpire_time(key), reply::int).await
    }

    /// Remaining time to live, millisecond precision
    async fn pttl(&self, ctx: &Context, key: &str) -> RedisResult<Expiry> {
        run(self, ctx, commands::generic::pttl(key), reply::expiry_millis).await
    }

    /// Remaining time to live, second precision
    async fn ttl(&self, ctx: &Context, key: &str) -> RedisResult<Expiry> {
        run(self, ctx, commands::generic::ttl(key), reply::expiry_secs).await
    }

    /// Type of the value stored at `key`
    async fn key_type(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, commands::generic::key_type(key), reply::status).await
    }

    /// Read-only `SORT`
    async fn sort_ro(&self, ctx: &Context, key: &str, sort: &Sort) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::generic::sort_ro(key, sort), reply::strings_or_empty).await
    }

    /// Distance between two members, nil if either is missing
    async fn geodist(
        &self,
        ctx: &Context,
        key: &str,
        member1: &str,
        member2: &str,
        unit: &str,
    ) -> RedisResult<f64> {
        run(self, ctx, commands::geo::geodist(key, member1, member2, unit), reply::float).await
    }

    /// Geohash strings of members
    async fn geohash<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<String>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, commands::geo::geohash(key, members), reply::opt_strings).await
    }

    /// Positions of members, `None` for missing ones
    async fn geopos<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<GeoPos>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, commands::geo::geopos(key, members), reply::geo_pos).await
    }

    /// Read-only `GEORADIUS`
    async fn georadius_ro(
        &self,
        ctx: &Context,
        key: &str,
        longitude: f64,
        latitude: f64,
        query: &GeoRadiusQuery,
    ) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, commands::geo::georadius_ro(key, longitude, latitude, query), parse).await
    }

    /// Read-only `GEORADIUSBYMEMBER`
    async fn georadius_by_member_ro(
        &self,
        ctx: &Context,
        key: &str,
        member: &str,
        query: &GeoRadiusQuery,
    ) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, commands::geo::georadius_by_member_ro(key, member, query), parse).await
    }

    /// Members inside a circle or box
    async fn geosearch(&self, ctx: &Context, key: &str, query: &GeoSearchQuery) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, commands::geo::geosearch(key, query), parse).await
    }

    /// Value of a key, nil when missing
    async fn get(&self, ctx: &Context, key: &str) -> RedisResult<String> {
        run(self, ctx, commands::string::get(key), reply::string).await
    }

    /// Substring between `start` and `end`, inclusive
    async fn get_range(&self, ctx: &Context, key: &str, start: i64, end: i64) -> RedisResult<String> {
        run(self, ctx, commands::string::get_range(key, start, end), reply::string).await
    }

    /// Values of keys, `None` for missing ones. All keys must share a slot
    async fn mget(&self, ctx: &Context, keys: &[&str]) -> RedisResult<Vec<Option<String>>> {
        run(self, ctx, commands::string::mget(keys), reply::opt_strings).await
    }

    /// Length of the value
    async fn strlen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::string::strlen(key), reply::int).await
    }

    /// Whether the field exists
    async fn hexists<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<bool>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, commands::hash::hexists(key, field), reply::boolean).await
    }

    /// Value of a field, nil when missing
    async fn hget<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<String>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, commands::hash::hget(key, field), reply::string).await
    }

    /// Every field and value
    async fn hgetall(&self, ctx: &Context, key: &str) -> RedisResult<HashMap<String, String>> {
        run(self, ctx, commands::hash::hgetall(key), reply::string_map).await
    }

    /// Every field name
    async fn hkeys(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::hash::hkeys(key), reply::strings).await
    }

    /// Number of fields
    async fn hlen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::hash::hlen(key), reply::int).await
    }

    /// Values of fields, `None` for missing ones
    async fn hmget<F>(&self, ctx: &Context, key: &str, fields: &[F]) -> RedisResult<Vec<Option<String>>>
    where
        F: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, commands::hash::hmget(key, fields), reply::opt_strings).await
    }

    /// Length of a field's value
    async fn hstrlen<F>(&self, ctx: &Context, key: &str, field: F) -> RedisResult<i64>
    where
        F: Into<Arg> + Send,
    {
        run(self, ctx, commands::hash::hstrlen(key, field), reply::int).await
    }

    /// Every value
    async fn hvals(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::hash::hvals(key), reply::strings).await
    }

    /// Element at `index`, nil when out of range
    async fn lindex(&self, ctx: &Context, key: &str, index: i64) -> RedisResult<String> {
        run(self, ctx, commands::list::lindex(key, index), reply::string).await
    }

    /// Length of the list
    async fn llen(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::list::llen(key), reply::int).await
    }

    /// Index of the first match, nil when absent
    async fn lpos<V>(&self, ctx: &Context, key: &str, element: V, args: LPosArgs) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::list::lpos(key, element, args), reply::int).await
    }

    /// Indices of up to `count` matches
    async fn lpos_count<V>(
        &self,
        ctx: &Context,
        key: &str,
        element: V,
        count: i64,
        args: LPosArgs,
    ) -> RedisResult<Vec<i64>>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::list::lpos_count(key, element, count, args), reply::ints).await
    }

    /// Elements between `start` and `stop`, inclusive
    async fn lrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::list::lrange(key, start, stop), reply::strings).await
    }

    /// Number of members
    async fn scard(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::set::scard(key), reply::int).await
    }

    /// Whether `member` belongs to the set
    async fn sismember<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<bool>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::set::sismember(key, member), reply::boolean).await
    }

    /// Every member
    async fn smembers(&self, ctx: &Context, key: &str) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::set::smembers(key), reply::strings).await
    }

    /// Membership of each given member
    async fn smismember<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<bool>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, commands::set::smismember(key, members), reply::bools).await
    }

    /// Number of members
    async fn zcard(&self, ctx: &Context, key: &str) -> RedisResult<i64> {
        run(self, ctx, commands::sorted_set::zcard(key), reply::int).await
    }

    /// Members with a score between `min` and `max`
    async fn zcount<A, B>(&self, ctx: &Context, key: &str, min: A, max: B) -> RedisResult<i64>
    where
        A: Into<Arg> + Send,
        B: Into<Arg> + Send,
    {
        run(self, ctx, commands::sorted_set::zcount(key, min, max), reply::int).await
    }

    /// Members between two lexicographic bounds
    async fn zlex_count(&self, ctx: &Context, key: &str, min: &str, max: &str) -> RedisResult<i64> {
        run(self, ctx, commands::sorted_set::zlex_count(key, min, max), reply::int).await
    }

    /// Scores of members, `None` for missing ones
    async fn zmscore<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<f64>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, commands::sorted_set::zmscore(key, members), reply::opt_floats).await
    }

    /// Members by rank
    async fn zrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::sorted_set::zrange(key, start, stop), reply::strings).await
    }

    /// Members and scores by rank
    async fn zrange_withscores(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<Z>> {
        run(self, ctx, commands::sorted_set::zrange_withscores(key, start, stop), reply::zs).await
    }

    /// `ZRANGE` with `BYSCORE`/`BYLEX`, `REV` and `LIMIT`
    async fn zrange_args(&self, ctx: &Context, args: &ZRangeArgs) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::sorted_set::zrange_args(args), reply::strings).await
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
        run(self, ctx, commands::sorted_set::zrange_by_lex(key, min, max, limit), reply::strings).await
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
        run(self, ctx, commands::sorted_set::zrange_by_score(key, min, max, limit), reply::strings).await
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
        let cmd = commands::sorted_set::zrange_by_score_withscores(key, min, max, limit);
        run(self, ctx, cmd, reply::zs).await
    }

    /// Rank of a member, nil when absent
    async fn zrank<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::sorted_set::zrank(key, member), reply::int).await
    }

    /// Members by rank, highest first
    async fn zrev_range(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<String>> {
        run(self, ctx, commands::sorted_set::zrev_range(key, start, stop), reply::strings).await
    }

    /// `ZREVRANGE` with scores
    async fn zrev_range_withscores(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> RedisResult<Vec<Z>> {
        run(self, ctx, commands::sorted_set::zrev_range_withscores(key, start, stop), reply::zs).await
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
        let cmd = commands::sorted_set::zrev_range_by_score(key, max, min, limit);
        run(self, ctx, cmd, reply::strings).await
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
        let cmd = commands::sorted_set::zrev_range_by_score_withscores(key, max, min, limit);
        run(self, ctx, cmd, reply::zs).await
    }

    /// Rank of a member counting from the highest score
    async fn zrev_rank<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<i64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::sorted_set::zrev_rank(key, member), reply::int).await
    }

    /// Score of a member, nil when absent
    async fn zscore<V>(&self, ctx: &Context, key: &str, member: V) -> RedisResult<f64>
    where
        V: Into<Arg> + Send,
    {
        run(self, ctx, commands::sorted_set::zscore(key, member), reply::float).await
    }
}
