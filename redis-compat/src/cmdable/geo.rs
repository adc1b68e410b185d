use super::{run, Dispatch};
use crate::commands::geo as cmd;
use crate::commands::{GeoMember, GeoRadiusQuery, GeoSearchQuery};
use crate::context::Context;
use crate::reply;
use crate::types::{GeoLocation, GeoPos};
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// Geospatial commands.
///
/// Query builders panic on conflicting options (`STORE` with `STOREDIST`,
/// `STORE*` on a read-only variant, `WITH*` on a store variant).
#[async_trait]
pub trait GeoCommands: Dispatch {
    /// Add positioned members; returns how many were new
    async fn geoadd(&self, ctx: &Context, key: &str, members: &[GeoMember]) -> RedisResult<i64> {
        run(self, ctx, cmd::geoadd(key, members), reply::int).await
    }

    /// Distance in `unit` (empty means km); nil when a member is missing
    async fn geodist(
        &self,
        ctx: &Context,
        key: &str,
        member1: &str,
        member2: &str,
        unit: &str,
    ) -> RedisResult<f64> {
        run(self, ctx, cmd::geodist(key, member1, member2, unit), reply::float).await
    }

    /// Geohash strings of members
    async fn geohash<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<String>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::geohash(key, members), reply::opt_strings).await
    }

    /// Positions of members, `None` for missing ones
    async fn geopos<V>(&self, ctx: &Context, key: &str, members: &[V]) -> RedisResult<Vec<Option<GeoPos>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::geopos(key, members), reply::geo_pos).await
    }

    /// Members within a radius of a point
    async fn georadius(
        &self,
        ctx: &Context,
        key: &str,
        longitude: f64,
        latitude: f64,
        query: &GeoRadiusQuery,
    ) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, cmd::georadius(key, longitude, latitude, query), parse).await
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
        run(self, ctx, cmd::georadius_ro(key, longitude, latitude, query), parse).await
    }

    /// Number of stored members
    async fn georadius_store(
        &self,
        ctx: &Context,
        key: &str,
        longitude: f64,
        latitude: f64,
        query: &GeoRadiusQuery,
    ) -> RedisResult<i64> {
        run(self, ctx, cmd::georadius_store(key, longitude, latitude, query), reply::int).await
    }

    /// Members within a radius of another member
    async fn georadius_by_member(
        &self,
        ctx: &Context,
        key: &str,
        member: &str,
        query: &GeoRadiusQuery,
    ) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, cmd::georadius_by_member(key, member, query), parse).await
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
        run(self, ctx, cmd::georadius_by_member_ro(key, member, query), parse).await
    }

    /// `GEORADIUSBYMEMBER` with `STORE` or `STOREDIST`
    async fn georadius_by_member_store(
        &self,
        ctx: &Context,
        key: &str,
        member: &str,
        query: &GeoRadiusQuery,
    ) -> RedisResult<i64> {
        run(self, ctx, cmd::georadius_by_member_store(key, member, query), reply::int).await
    }

    /// Members inside a circle or box
    async fn geosearch(&self, ctx: &Context, key: &str, query: &GeoSearchQuery) -> RedisResult<Vec<GeoLocation>> {
        let parse = reply::geo_locations(query.with_coord, query.with_dist, query.with_hash);
        run(self, ctx, cmd::geosearch(key, query), parse).await
    }

    /// Store the result of a `GEOSEARCH` into `destination`
    async fn geosearch_store(
        &self,
        ctx: &Context,
        destination: &str,
        source: &str,
        query: &GeoSearchQuery,
    ) -> RedisResult<i64> {
        run(self, ctx, cmd::geosearch_store(destination, source, query), reply::int).await
    }
}
