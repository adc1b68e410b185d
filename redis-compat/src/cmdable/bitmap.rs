use super::{run, Dispatch};
use crate::commands::bitmap as cmd;
use crate::commands::{BitCount, BitOp, BitPos};
use crate::context::Context;
use crate::reply;
use async_trait::async_trait;
use redis_compat_core::{Arg, RedisResult};

/// Bitmap commands
#[async_trait]
pub trait BitmapCommands: Dispatch {
    /// Count set bits, optionally within a range
    async fn bitcount(&self, ctx: &Context, key: &str, range: Option<BitCount>) -> RedisResult<i64> {
        run(self, ctx, cmd::bitcount(key, range), reply::int).await
    }

    /// One entry per `GET`/`INCRBY` sub-command; nil on `OVERFLOW FAIL`
    async fn bitfield<V>(&self, ctx: &Context, key: &str, args: &[V]) -> RedisResult<Vec<Option<i64>>>
    where
        V: Into<Arg> + Clone + Sync,
    {
        run(self, ctx, cmd::bitfield(key, args), reply::opt_ints).await
    }

    /// Combine bitmaps into `destination`; returns the length of the result
    async fn bitop(&self, ctx: &Context, op: BitOp, destination: &str, keys: &[&str]) -> RedisResult<i64> {
        run(self, ctx, cmd::bitop(op, destination, keys), reply::int).await
    }

    /// Position of the first bit equal to `bit`, `-1` if none
    async fn bitpos(&self, ctx: &Context, key: &str, bit: bool, range: BitPos) -> RedisResult<i64> {
        run(self, ctx, cmd::bitpos(key, bit, range), reply::int).await
    }

    /// Bit value at `offset`
    async fn getbit(&self, ctx: &Context, key: &str, offset: i64) -> RedisResult<i64> {
        run(self, ctx, cmd::getbit(key, offset), reply::int).await
    }

    /// The previous bit
    async fn setbit(&self, ctx: &Context, key: &str, offset: i64, value: bool) -> RedisResult<i64> {
        run(self, ctx, cmd::setbit(key, offset, value), reply::int).await
    }
}
