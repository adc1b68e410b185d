use super::{run, Dispatch};
use crate::commands::stream as cmd;
use crate::commands::{XAddArgs, XClaimArgs, XPendingExtArgs, XReadArgs, XReadGroupArgs, XTrimArgs};
use crate::context::Context;
use crate::reply;
use crate::types::{XAutoClaim, XAutoClaimJustId, XMessage, XPending, XPendingExt, XStream};
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// Stream commands
#[async_trait]
pub trait StreamCommands: Dispatch {
    /// Acknowledge entries; returns how many were pending
    async fn xack<V>(&self, ctx: &Context, stream: &str, group: &str, ids: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::xack(stream, group, ids), reply::int).await
    }

    /// ID of the new entry; nil with `NOMKSTREAM` on a missing stream
    async fn xadd(&self, ctx: &Context, args: &XAddArgs) -> RedisResult<String> {
        run(self, ctx, cmd::xadd(args), reply::string).await
    }

    /// Transfer idle pending entries to another consumer
    async fn xautoclaim(&self, ctx: &Context, args: &XClaimArgs) -> RedisResult<XAutoClaim> {
        run(self, ctx, cmd::xautoclaim(args), reply::xautoclaim).await
    }

    /// `XAUTOCLAIM` returning only ids
    async fn xautoclaim_justid(&self, ctx: &Context, args: &XClaimArgs) -> RedisResult<XAutoClaimJustId> {
        run(self, ctx, cmd::xautoclaim_justid(args), reply::xautoclaim_justid).await
    }

    /// Take ownership of pending entries
    async fn xclaim(&self, ctx: &Context, args: &XClaimArgs) -> RedisResult<Vec<XMessage>> {
        run(self, ctx, cmd::xclaim(args), reply::xmessages).await
    }

    /// `XCLAIM` returning only ids
    async fn xclaim_justid(&self, ctx: &Context, args: &XClaimArgs) -> RedisResult<Vec<String>> {
        run(self, ctx, cmd::xclaim_justid(args), reply::strings).await
    }

    /// Delete entries; returns how many were removed
    async fn xdel<V>(&self, ctx: &Context, stream: &str, ids: &[V]) -> RedisResult<i64>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::xdel(stream, ids), reply::int).await
    }

    /// Create a consumer group
    async fn xgroup_create(
        &self,
        ctx: &Context,
        stream: &str,
        group: &str,
        start: &str,
        mk_stream: bool,
    ) -> RedisResult<()> {
        run(self, ctx, cmd::xgroup_create(stream, group, start, mk_stream), reply::ok).await
    }

    /// Create a consumer; true when it was new
    async fn xgroup_create_consumer(
        &self,
        ctx: &Context,
        stream: &str,
        group: &str,
        consumer: &str,
    ) -> RedisResult<bool> {
        run(self, ctx, cmd::xgroup_create_consumer(stream, group, consumer), reply::boolean).await
    }

    /// Number of pending entries the consumer had
    async fn xgroup_del_consumer(
        &self,
        ctx: &Context,
        stream: &str,
        group: &str,
        consumer: &str,
    ) -> RedisResult<i64> {
        run(self, ctx, cmd::xgroup_del_consumer(stream, group, consumer), reply::int).await
    }

    /// Destroy a consumer group
    async fn xgroup_destroy(&self, ctx: &Context, stream: &str, group: &str) -> RedisResult<bool> {
        run(self, ctx, cmd::xgroup_destroy(stream, group), reply::boolean).await
    }

    /// Move the last delivered id of a group
    async fn xgroup_set_id(&self, ctx: &Context, stream: &str, group: &str, start: &str) -> RedisResult<()> {
        run(self, ctx, cmd::xgroup_set_id(stream, group, start), reply::ok).await
    }

    /// Number of entries
    async fn xlen(&self, ctx: &Context, stream: &str) -> RedisResult<i64> {
        run(self, ctx, cmd::xlen(stream), reply::int).await
    }

    /// Summary of a group's pending entries
    async fn xpending(&self, ctx: &Context, stream: &str, group: &str) -> RedisResult<XPending> {
        run(self, ctx, cmd::xpending(stream, group), reply::xpending).await
    }

    /// Pending entries in an id range
    async fn xpending_ext(&self, ctx: &Context, args: &XPendingExtArgs) -> RedisResult<Vec<XPendingExt>> {
        run(self, ctx, cmd::xpending_ext(args), reply::xpending_ext).await
    }

    /// Entries between two ids
    async fn xrange(
        &self,
        ctx: &Context,
        stream: &str,
        start: &str,
        stop: &str,
        count: Option<i64>,
    ) -> RedisResult<Vec<XMessage>> {
        run(self, ctx, cmd::xrange(stream, start, stop, count), reply::xmessages).await
    }

    /// Entries between two ids, newest first
    async fn xrev_range(
        &self,
        ctx: &Context,
        stream: &str,
        end: &str,
        start: &str,
        count: Option<i64>,
    ) -> RedisResult<Vec<XMessage>> {
        run(self, ctx, cmd::xrev_range(stream, end, start, count), reply::xmessages).await
    }

    /// Nil when `BLOCK` expired without new entries
    async fn xread(&self, ctx: &Context, args: &XReadArgs) -> RedisResult<Vec<XStream>> {
        run(self, ctx, cmd::xread(args), reply::xstreams).await
    }

    /// Read as a member of a consumer group
    async fn xread_group(&self, ctx: &Context, args: &XReadGroupArgs) -> RedisResult<Vec<XStream>> {
        run(self, ctx, cmd::xread_group(args), reply::xstreams).await
    }

    /// Trim the stream; returns how many entries were removed
    async fn xtrim(&self, ctx: &Context, stream: &str, args: &XTrimArgs) -> RedisResult<i64> {
        run(self, ctx, cmd::xtrim(stream, args), reply::int).await
    }
}
